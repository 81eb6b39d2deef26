#[cfg(test)]
pub mod fixtures {
    use std::cmp::Ordering;
    use std::collections::HashMap;

    use regex::Regex;
    use serde_json::{Map, Value};

    use crate::{
        config::Config,
        schema::{Association, SchemaDescriptor, SchemaRegistry},
        term::{Term, TermType},
        translator::Translator,
    };

    pub fn blog_registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with(SchemaDescriptor::new("User", "users")
                .with_association(Association::has_many("posts", "Post", "author_id")))
            .with(SchemaDescriptor::new("Post", "posts")
                .with_association(Association::belongs_to("author", "User", "author_id"))
                .with_association(Association::has_many("comments", "Comment", "post_id")))
            .with(SchemaDescriptor::new("Comment", "comments")
                .with_association(Association::belongs_to("post", "Post", "post_id")))
    }

    pub fn blog() -> Translator {
        Translator::new(Config::new(), blog_registry())
    }

    /// Just enough of a document store to run compiled pipelines in tests.
    #[derive(Default)]
    pub struct MiniStore {
        tables: HashMap<String, Vec<Value>>,
    }

    type Env = HashMap<u32, Value>;

    impl MiniStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_table(mut self, name: &str, rows: Value) -> Self {
            let rows = match rows {
                Value::Array(rows) => rows,
                other => panic!("expected rows array, got {other:?}"),
            };
            self.tables.insert(name.to_string(), rows);
            self
        }

        pub fn run(&self, term: &Term) -> Value {
            self.eval(term, &Env::new())
        }

        fn call(&self, func: &Term, args: Vec<Value>, env: &Env) -> Value {
            let Term::Func { params, body } = func else {
                panic!("expected Func, got {func:?}");
            };
            let mut env = env.clone();
            for (p, a) in params.iter().zip(args) {
                env.insert(*p, a);
            }
            self.eval(body, &env)
        }

        fn seq(&self, term: &Term, env: &Env) -> Vec<Value> {
            match self.eval(term, env) {
                Value::Array(items) => items,
                other => panic!("expected sequence, got {other:?}"),
            }
        }

        fn eval(&self, term: &Term, env: &Env) -> Value {
            match term {
                Term::Datum(v) => v.clone(),
                Term::MakeArray(items) => Value::Array(items.iter().map(|t| self.eval(t, env)).collect()),
                Term::MakeObject(entries) => {
                    Value::Object(entries.iter().map(|(k, t)| (k.clone(), self.eval(t, env))).collect())
                }
                Term::Var(id) => env.get(id).cloned().unwrap_or_else(|| panic!("unbound var {id}")),
                Term::Func { .. } => panic!("bare function outside of a call"),
                Term::Op { kind, args, optargs } => self.eval_op(*kind, args, optargs, env),
            }
        }

        fn eval_op(&self, kind: TermType, args: &[Term], optargs: &[(String, Term)], env: &Env) -> Value {
            match kind {
                TermType::Table => {
                    let name = self.eval(&args[args.len() - 1], env);
                    let name = name.as_str().expect("table name");
                    Value::Array(self.tables.get(name).cloned().unwrap_or_default())
                }
                TermType::Bracket => {
                    let doc = self.eval(&args[0], env);
                    let field = self.eval(&args[1], env);
                    doc.get(field.as_str().expect("field")).cloned().unwrap_or(Value::Null)
                }
                TermType::Nth => {
                    let seq = self.seq(&args[0], env);
                    let i = self.eval(&args[1], env).as_u64().expect("index") as usize;
                    seq[i].clone()
                }
                TermType::Map => Value::Array(
                    self.seq(&args[0], env).into_iter().map(|v| self.call(&args[1], vec![v], env)).collect(),
                ),
                TermType::ConcatMap => Value::Array(
                    self.seq(&args[0], env)
                        .into_iter()
                        .flat_map(|v| match self.call(&args[1], vec![v], env) {
                            Value::Array(items) => items,
                            other => panic!("concat_map needs arrays, got {other:?}"),
                        })
                        .collect(),
                ),
                TermType::Filter => Value::Array(
                    self.seq(&args[0], env)
                        .into_iter()
                        .filter(|v| truthy(&self.call(&args[1], vec![v.clone()], env)))
                        .collect(),
                ),
                TermType::Ungroup => {
                    let group = &args[0];
                    assert_eq!(group.kind(), TermType::Group);
                    let mut buckets: Vec<(Value, Vec<Value>)> = vec![];
                    for row in self.seq(&group.args()[0], env) {
                        let key = self.call(&group.args()[1], vec![row.clone()], env);
                        match buckets.iter_mut().find(|(k, _)| *k == key) {
                            Some((_, rows)) => rows.push(row),
                            None => buckets.push((key, vec![row])),
                        }
                    }
                    buckets.sort_by(|a, b| compare(&a.0, &b.0));
                    Value::Array(
                        buckets
                            .into_iter()
                            .map(|(group, reduction)| {
                                let mut m = Map::new();
                                m.insert("group".into(), group);
                                m.insert("reduction".into(), Value::Array(reduction));
                                Value::Object(m)
                            })
                            .collect(),
                    )
                }
                TermType::Count => Value::from(self.seq(&args[0], env).len()),
                TermType::Sum => {
                    let total: f64 = self.seq(&args[0], env).iter().filter_map(Value::as_f64).sum();
                    number(total)
                }
                TermType::Max => self.seq(&args[0], env).into_iter().max_by(compare).unwrap_or(Value::Null),
                TermType::Min => self.seq(&args[0], env).into_iter().min_by(compare).unwrap_or(Value::Null),
                TermType::Distinct => {
                    let mut out: Vec<Value> = vec![];
                    for v in self.seq(&args[0], env) {
                        if !out.contains(&v) {
                            out.push(v);
                        }
                    }
                    Value::Array(out)
                }
                TermType::Skip => {
                    let n = self.eval(&args[1], env).as_u64().expect("skip") as usize;
                    Value::Array(self.seq(&args[0], env).into_iter().skip(n).collect())
                }
                TermType::Limit => {
                    let n = self.eval(&args[1], env).as_u64().expect("limit") as usize;
                    Value::Array(self.seq(&args[0], env).into_iter().take(n).collect())
                }
                TermType::OrderBy => {
                    let mut rows = self.seq(&args[0], env);
                    rows.sort_by(|a, b| {
                        for key in &args[1..] {
                            let ord = compare(
                                &self.call(&key.args()[0], vec![a.clone()], env),
                                &self.call(&key.args()[0], vec![b.clone()], env),
                            );
                            let ord = if key.kind() == TermType::Desc { ord.reverse() } else { ord };
                            if ord != Ordering::Equal {
                                return ord;
                            }
                        }
                        Ordering::Equal
                    });
                    Value::Array(rows)
                }
                TermType::EqJoin => {
                    let index = optargs
                        .iter()
                        .find(|(k, _)| k == "index")
                        .map(|(_, v)| self.eval(v, env))
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_else(|| "id".to_string());
                    let right = self.seq(&args[2], env);
                    let mut out = vec![];
                    for l in self.seq(&args[0], env) {
                        let key = self.call(&args[1], vec![l.clone()], env);
                        for r in right.iter().filter(|r| r.get(&index) == Some(&key)) {
                            out.push(pair(l.clone(), r.clone()));
                        }
                    }
                    Value::Array(out)
                }
                TermType::InnerJoin => {
                    let right = self.seq(&args[1], env);
                    let mut out = vec![];
                    for l in self.seq(&args[0], env) {
                        for r in &right {
                            if truthy(&self.call(&args[2], vec![l.clone(), r.clone()], env)) {
                                out.push(pair(l.clone(), r.clone()));
                            }
                        }
                    }
                    Value::Array(out)
                }
                TermType::Append => {
                    let mut seq = self.seq(&args[0], env);
                    seq.push(self.eval(&args[1], env));
                    Value::Array(seq)
                }
                TermType::Contains => {
                    let item = self.eval(&args[1], env);
                    Value::Bool(self.seq(&args[0], env).contains(&item))
                }
                TermType::Match => {
                    let s = self.eval(&args[0], env);
                    let re = Regex::new(self.eval(&args[1], env).as_str().expect("regex")).expect("valid regex");
                    Value::Bool(s.as_str().is_some_and(|s| re.is_match(s)))
                }
                TermType::Eq | TermType::Ne | TermType::Lt | TermType::Le | TermType::Gt | TermType::Ge => {
                    let ord = compare(&self.eval(&args[0], env), &self.eval(&args[1], env));
                    Value::Bool(match kind {
                        TermType::Eq => ord == Ordering::Equal,
                        TermType::Ne => ord != Ordering::Equal,
                        TermType::Lt => ord == Ordering::Less,
                        TermType::Le => ord != Ordering::Greater,
                        TermType::Gt => ord == Ordering::Greater,
                        _ => ord != Ordering::Less,
                    })
                }
                TermType::And => Value::Bool(args.iter().all(|a| truthy(&self.eval(a, env)))),
                TermType::Or => Value::Bool(args.iter().any(|a| truthy(&self.eval(a, env)))),
                TermType::Not => Value::Bool(!truthy(&self.eval(&args[0], env))),
                TermType::Add | TermType::Sub | TermType::Mul | TermType::Div => {
                    let a = self.eval(&args[0], env).as_f64().expect("number");
                    let b = self.eval(&args[1], env).as_f64().expect("number");
                    number(match kind {
                        TermType::Add => a + b,
                        TermType::Sub => a - b,
                        TermType::Mul => a * b,
                        _ => a / b,
                    })
                }
                other => panic!("MiniStore does not run {other:?}"),
            }
        }
    }

    fn pair(left: Value, right: Value) -> Value {
        let mut m = Map::new();
        m.insert("left".into(), left);
        m.insert("right".into(), right);
        Value::Object(m)
    }

    fn truthy(v: &Value) -> bool {
        !matches!(v, Value::Null | Value::Bool(false))
    }

    fn number(f: f64) -> Value {
        if f.fract() == 0.0 { Value::from(f as i64) } else { Value::from(f) }
    }

    fn compare(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                x.as_f64().unwrap_or(0.0).partial_cmp(&y.as_f64().unwrap_or(0.0)).unwrap_or(Ordering::Equal)
            }
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Array(x), Value::Array(y)) => {
                for (l, r) in x.iter().zip(y) {
                    let ord = compare(l, r);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                x.len().cmp(&y.len())
            }
            _ if a == b => Ordering::Equal,
            _ => a.to_string().cmp(&b.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::fixtures::{blog, blog_registry, MiniStore};
    use crate::{
        ast::{AggregateFunc, ArithmeticOp, ComparatorOp, Distinct, Expr, Join, MutationOp, OrderBy, Query, Source},
        config::Config,
        schema::{Association, SchemaDescriptor, SchemaRegistry},
        term::{Term, TermType},
        translator::{TranslateError, Translator},
    };

    fn posts() -> Query {
        Query::from(blog_registry().get("Post").expect("Post schema").source())
    }

    fn store() -> MiniStore {
        MiniStore::new()
            .with_table("users", json!([
                { "id": 1, "name": "ann" },
                { "id": 2, "name": "bob" }
            ]))
            .with_table("posts", json!([
                { "id": 10, "title": "Moon",   "author_id": 1, "views": 5,  "tags": ["space"] },
                { "id": 11, "title": "mars",   "author_id": 2, "views": 12, "tags": [] },
                { "id": 12, "title": "Comets", "author_id": 1, "views": 7,  "tags": ["space", "ice"] }
            ]))
            .with_table("comments", json!([
                { "id": 100, "post_id": 10, "body": "nice" },
                { "id": 101, "post_id": 10, "body": "meh" },
                { "id": 102, "post_id": 12, "body": "cold" }
            ]))
    }

    fn regex_of(term: &Term) -> String {
        // filter(table, func(row => match(field, regex)))
        let Term::Func { body, .. } = &term.args()[1] else {
            panic!("expected Func, got {:?}", term.args()[1]);
        };
        assert_eq!(body.kind(), TermType::Match);
        body.args()[1].to_json().as_str().expect("regex string").to_string()
    }

    #[test]
    fn compilation_is_pure() {
        let t = blog();
        let q = posts()
            .join(Join::assoc(Source::with_schema("users", "User")))
            .filter(Expr::compare(Expr::field(0, "views"), ComparatorOp::Gt, Expr::Param(0)))
            .group_by(Expr::field(1, "name"))
            .order_by(OrderBy::desc(Expr::count(Expr::Entity(0))))
            .limit(Expr::Param(1))
            .select(Expr::List(vec![Expr::field(1, "name"), Expr::count(Expr::Entity(0))]));
        let params = vec![json!(3), json!(10)];

        let a = t.compile_query(&q, &params).unwrap();
        let b = t.compile_query(&q, &params).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_json(), b.to_json());
    }

    #[test]
    fn offset_is_applied_before_limit() {
        let q = posts().limit(Expr::lit(1)).offset(Expr::lit(1));
        let term = blog().compile_query(&q, &[]).unwrap();

        assert_eq!(term.kind(), TermType::Limit);
        assert_eq!(term.args()[0].kind(), TermType::Skip);
        assert_eq!(term, Term::table(None, "posts").skip(Term::datum(1)).limit(Term::datum(1)));

        let out = store().run(&term);
        assert_eq!(out.as_array().unwrap().len(), 1);
        assert_eq!(out[0]["id"], json!(11));
    }

    #[test]
    fn like_patterns_are_anchored_by_wildcards() {
        let t = blog();
        let cases = [
            ("M%", "^M"),
            ("%s", "s$"),
            ("%o%", "o"),
            ("Moon", "^Moon$"),
        ];
        for (pattern, expected) in cases {
            let q = posts().filter(Expr::like(Expr::field(0, "title"), Expr::lit(pattern)));
            assert_eq!(regex_of(&t.compile_query(&q, &[]).unwrap()), expected, "pattern {pattern}");

            let q = posts().filter(Expr::ilike(Expr::field(0, "title"), Expr::lit(pattern)));
            assert_eq!(regex_of(&t.compile_query(&q, &[]).unwrap()), format!("(?i){expected}"), "pattern {pattern}");
        }
    }

    #[test]
    fn ilike_matches_regardless_of_case() {
        let q = posts().filter(Expr::ilike(Expr::field(0, "title"), Expr::Param(0)));
        let term = blog().compile_query(&q, &[json!("m%")]).unwrap();
        let titles: Vec<Value> = store().run(&term).as_array().unwrap().iter().map(|r| r["title"].clone()).collect();
        assert_eq!(titles, vec![json!("Moon"), json!("mars")]);
    }

    #[test]
    fn count_distinct_is_distinct_then_count() {
        let q = posts().select(Expr::count_distinct(Expr::field(0, "author_id")));
        let term = blog().compile_query(&q, &[]).unwrap();

        let expected = Term::table(None, "posts")
            .map(Term::func(vec![1], Term::Var(1).bracket("author_id")))
            .distinct()
            .count();
        assert_eq!(term, expected);
        assert_eq!(store().run(&term), json!(2));
    }

    #[test]
    fn grouped_key_and_count_reduce_per_bucket() {
        let q = Query::from(Source::table("items"))
            .group_by(Expr::field(0, "k"))
            .select(Expr::List(vec![Expr::field(0, "k"), Expr::count(Expr::field(0, "id"))]));
        let term = blog().compile_query(&q, &[]).unwrap();

        assert_eq!(term.kind(), TermType::Map);
        assert_eq!(term.args()[0].kind(), TermType::Ungroup);

        let store = MiniStore::new().with_table("items", json!([
            { "id": 1, "k": 1 },
            { "id": 2, "k": 1 },
            { "id": 3, "k": 2 }
        ]));
        assert_eq!(store.run(&term), json!([[1, 2], [2, 1]]));
    }

    #[test]
    fn grouping_by_two_keys_reads_positional_group_slots() {
        let q = Query::from(Source::table("items"))
            .group_by(Expr::field(0, "a"))
            .group_by(Expr::field(0, "b"))
            .select(Expr::Map(vec![
                ("b".into(), Expr::field(0, "b")),
                ("total".into(), Expr::aggregate(AggregateFunc::Sum, Expr::field(0, "n"))),
            ]));
        let term = blog().compile_query(&q, &[]).unwrap();
        let store = MiniStore::new().with_table("items", json!([
            { "a": 1, "b": "x", "n": 2 },
            { "a": 1, "b": "x", "n": 3 },
            { "a": 1, "b": "y", "n": 4 }
        ]));
        assert_eq!(store.run(&term), json!([{ "b": "x", "total": 5 }, { "b": "y", "total": 4 }]));
    }

    #[test]
    fn non_key_field_under_grouping_is_rejected() {
        let q = posts()
            .group_by(Expr::field(0, "author_id"))
            .select(Expr::List(vec![Expr::field(0, "title"), Expr::count(Expr::Entity(0))]));
        match blog().compile_query(&q, &[]) {
            Err(TranslateError::IllegalGroupedField(f)) => assert_eq!(f, "$0.title"),
            other => panic!("expected IllegalGroupedField, got {other:?}"),
        }
    }

    #[test]
    fn having_and_ordering_by_aggregates() {
        let q = posts()
            .group_by(Expr::field(0, "author_id"))
            .having(Expr::compare(Expr::count(Expr::Entity(0)), ComparatorOp::Gt, Expr::lit(1)))
            .order_by(OrderBy::desc(Expr::aggregate(AggregateFunc::Sum, Expr::field(0, "views"))))
            .select(Expr::List(vec![
                Expr::field(0, "author_id"),
                Expr::aggregate(AggregateFunc::Sum, Expr::field(0, "views")),
            ]));
        let term = blog().compile_query(&q, &[]).unwrap();
        assert_eq!(store().run(&term), json!([[1, 12]]));
    }

    #[test]
    fn grouped_entity_projection_flattens_rows() {
        let q = posts().group_by(Expr::field(0, "author_id"));
        let term = blog().compile_query(&q, &[]).unwrap();
        assert_eq!(term.kind(), TermType::ConcatMap);
        assert_eq!(store().run(&term).as_array().unwrap().len(), 3);
    }

    #[test]
    fn distinct_on_expression_is_rejected() {
        let q = posts().distinct(Distinct::Expr(Expr::field(0, "title")));
        match blog().compile_query(&q, &[]) {
            Err(e @ TranslateError::UnsupportedDistinctExpression(_)) => {
                assert!(e.to_string().contains("group_by"));
            }
            other => panic!("expected UnsupportedDistinctExpression, got {other:?}"),
        }
    }

    #[test]
    fn distinct_flag_dedupes_projected_values() {
        let q = posts().select(Expr::field(0, "author_id")).distinct(Distinct::Flag(true));
        let term = blog().compile_query(&q, &[]).unwrap();
        assert_eq!(term.kind(), TermType::Distinct);
        assert_eq!(store().run(&term), json!([1, 2]));
    }

    fn a_to_b(with_association: bool) -> Translator {
        let a = SchemaDescriptor::new("A", "as");
        let a = if with_association { a.with_association(Association::belongs_to("b", "B", "b_id")) } else { a };
        Translator::new(Config::new(), SchemaRegistry::new().with(a).with(SchemaDescriptor::new("B", "bs")))
    }

    #[test]
    fn association_join_is_equality_join_on_foreign_key() {
        let q = Query::from(Source::with_schema("as", "A")).join(Join::assoc(Source::with_schema("bs", "B")));
        let term = a_to_b(true).compile_query(&q, &[]).unwrap();

        // map(eq_join(...), merge) then map(pick relation 0)
        let eq_join = &term.args()[0].args()[0];
        assert_eq!(eq_join.kind(), TermType::EqJoin);
        assert_eq!(eq_join.args()[1], Term::func(vec![1], Term::Var(1).bracket("b_id")));
        assert_eq!(eq_join.args()[2], Term::table(None, "bs"));
    }

    #[test]
    fn removing_the_association_breaks_the_join() {
        let q = Query::from(Source::with_schema("as", "A")).join(Join::assoc(Source::with_schema("bs", "B")));
        match a_to_b(false).compile_query(&q, &[]) {
            Err(TranslateError::MissingJoinRelationship { right, .. }) => assert_eq!(right, "bs"),
            other => panic!("expected MissingJoinRelationship, got {other:?}"),
        }
    }

    #[test]
    fn joined_fields_resolve_by_relation_slot() {
        let q = posts()
            .join(Join::assoc(Source::with_schema("users", "User")))
            .filter(Expr::eq(Expr::field(1, "name"), Expr::Param(0)))
            .order_by(OrderBy::asc(Expr::field(0, "id")))
            .select(Expr::List(vec![Expr::field(0, "title"), Expr::field(1, "name")]));
        let term = blog().compile_query(&q, &[json!("ann")]).unwrap();
        assert_eq!(store().run(&term), json!([["Moon", "ann"], ["Comets", "ann"]]));
    }

    #[test]
    fn has_many_join_uses_foreign_key_index() {
        let q = posts()
            .join(Join::assoc(Source::with_schema("comments", "Comment")))
            .select(Expr::List(vec![Expr::field(0, "id"), Expr::field(1, "body")]));
        let term = blog().compile_query(&q, &[]).unwrap();
        let eq_join = &term.args()[0].args()[0];
        assert_eq!(eq_join.optarg("index"), Some(&Term::datum("post_id")));
        assert_eq!(store().run(&term).as_array().unwrap().len(), 3);
    }

    #[test]
    fn three_way_join_appends_to_the_record() {
        let q = Query::from(Source::with_schema("comments", "Comment"))
            .join(Join::assoc(Source::with_schema("posts", "Post")))
            .join(Join::assoc(Source::with_schema("users", "User")))
            .filter(Expr::eq(Expr::field(0, "id"), Expr::lit(102)))
            .select(Expr::List(vec![Expr::field(0, "body"), Expr::field(1, "title"), Expr::field(2, "name")]));
        let term = blog().compile_query(&q, &[]).unwrap();
        assert_eq!(store().run(&term), json!([["cold", "Comets", "ann"]]));
    }

    #[test]
    fn predicate_join_runs_as_inner_join() {
        let cond = Expr::And(vec![
            Expr::eq(Expr::field(0, "author_id"), Expr::field(1, "id")),
            Expr::compare(Expr::field(0, "views"), ComparatorOp::Gt, Expr::lit(6)),
        ]);
        let q = posts()
            .join(Join::new(Source::table("users"), cond))
            .select(Expr::List(vec![Expr::field(0, "title"), Expr::field(1, "name")]));
        let term = blog().compile_query(&q, &[]).unwrap();
        assert_eq!(term.args()[0].args()[0].kind(), TermType::InnerJoin);
        assert_eq!(store().run(&term), json!([["mars", "bob"], ["Comets", "ann"]]));
    }

    #[test]
    fn whole_entity_moves_to_front() {
        let q = posts()
            .filter(Expr::eq(Expr::field(0, "id"), Expr::lit(10)))
            .select(Expr::List(vec![Expr::field(0, "id"), Expr::Entity(0), Expr::field(0, "title")]));
        let term = blog().compile_query(&q, &[]).unwrap();

        let map = Term::func(
            vec![2],
            Term::MakeArray(vec![Term::Var(2), Term::Var(2).bracket("id"), Term::Var(2).bracket("title")]),
        );
        assert_eq!(term.args()[1], map);

        let out = store().run(&term);
        assert_eq!(out[0][0]["title"], json!("Moon"));
        assert_eq!(out[0][1], json!(10));
        assert_eq!(out[0][2], json!("Moon"));
    }

    #[test]
    fn tuple_projection_moves_the_entity_first() {
        let q = posts()
            .filter(Expr::eq(Expr::field(0, "id"), Expr::lit(12)))
            .select(Expr::Tuple(vec![Expr::field(0, "id"), Expr::Entity(0), Expr::field(0, "title")]));
        let out = store().run(&blog().compile_query(&q, &[]).unwrap());
        assert_eq!(out[0][0]["views"], json!(7));
        assert_eq!(out[0][1], json!(12));
        assert_eq!(out[0][2], json!("Comets"));
    }

    #[test]
    fn arithmetic_projection_runs_per_row() {
        let doubled = posts().select(Expr::arithmetic(Expr::field(0, "views"), ArithmeticOp::Mul, Expr::lit(2)));
        let term = blog().compile_query(&doubled, &[]).unwrap();
        assert_eq!(term.args()[1], Term::func(vec![1], Term::binary(TermType::Mul, Term::Var(1).bracket("views"), Term::datum(2))));
        assert_eq!(store().run(&term), json!([10, 24, 14]));

        let shifted = posts().select(Expr::arithmetic(Expr::field(0, "views"), ArithmeticOp::Add, Expr::Param(0)));
        let out = store().run(&blog().compile_query(&shifted, &[json!(1)]).unwrap());
        assert_eq!(out, json!([6, 13, 8]));

        let less = posts().select(Expr::arithmetic(Expr::field(0, "views"), ArithmeticOp::Sub, Expr::lit(5)));
        assert_eq!(store().run(&blog().compile_query(&less, &[]).unwrap()), json!([0, 7, 2]));
    }

    #[test]
    fn preloads_follow_the_entity_slot() {
        let q = posts()
            .join(Join::assoc(Source::with_schema("users", "User")))
            .filter(Expr::eq(Expr::field(0, "id"), Expr::lit(11)))
            .select(Expr::List(vec![Expr::field(0, "title"), Expr::Entity(0)]))
            .preload(1);
        let out = store().run(&blog().compile_query(&q, &[]).unwrap());
        assert_eq!(out, json!([[
            { "id": 11, "title": "mars", "author_id": 2, "views": 12, "tags": [] },
            { "id": 2, "name": "bob" },
            "mars"
        ]]));
    }

    #[test]
    fn membership_with_pinned_list() {
        let q = posts()
            .filter(Expr::is_in(Expr::field(0, "id"), Expr::ParamSlice { start: 0, len: 2 }))
            .select(Expr::field(0, "id"));
        let term = blog().compile_query(&q, &[json!(10), json!(12)]).unwrap();
        assert_eq!(store().run(&term), json!([10, 12]));

        let q = posts().filter(Expr::is_in(Expr::field(0, "id"), Expr::Param(0)));
        assert!(matches!(
            blog().compile_query(&q, &[json!(10)]),
            Err(TranslateError::MalformedParameter(_))
        ));
    }

    #[test]
    fn ungrouped_aggregate_list_is_a_single_row() {
        let q = posts().select(Expr::List(vec![
            Expr::count(Expr::Entity(0)),
            Expr::aggregate(AggregateFunc::Max, Expr::field(0, "views")),
        ]));
        let term = blog().compile_query(&q, &[]).unwrap();
        assert_eq!(store().run(&term), json!([[3, 12]]));
    }

    #[test]
    fn aggregate_in_filter_is_rejected() {
        let q = posts().filter(Expr::compare(Expr::count(Expr::Entity(0)), ComparatorOp::Gt, Expr::lit(1)));
        assert!(matches!(blog().compile_query(&q, &[]), Err(TranslateError::UnrecognizedExpression(_))));
    }

    #[test]
    fn missing_parameter_yields_no_pipeline() {
        let q = posts().filter(Expr::eq(Expr::field(0, "id"), Expr::Param(2)));
        match blog().compile_query(&q, &[json!(1)]) {
            Err(TranslateError::MalformedParameter(_)) => {}
            other => panic!("expected MalformedParameter, got {other:?}"),
        }
    }

    #[test]
    fn database_qualifies_every_table() {
        let t = Translator::new(Config::with_database("blog"), blog_registry());
        let q = posts().join(Join::assoc(Source::with_schema("users", "User")));
        let json = t.compile_query(&q, &[]).unwrap().to_json().to_string();
        assert!(json.contains(r#"[15,[[14,["blog"]],"posts"]]"#));
        assert!(json.contains(r#"[15,[[14,["blog"]],"users"]]"#));
    }

    #[test]
    fn update_all_patches_filtered_rows() {
        let q = posts().filter(Expr::eq(Expr::field(0, "author_id"), Expr::Param(0)));
        let ops = vec![
            Expr::mutation(MutationOp::Inc, "views", Expr::lit(1)),
            Expr::mutation(MutationOp::Pull, "tags", Expr::lit("space")),
        ];
        let term = blog().compile_update_all(&q, &[json!(1)], &ops).unwrap();
        assert_eq!(term.kind(), TermType::Update);
        assert_eq!(term.args()[0].kind(), TermType::Filter);

        let q = posts().order_by(OrderBy::asc(Expr::field(0, "id")));
        assert!(matches!(
            blog().compile_update_all(&q, &[], &ops),
            Err(TranslateError::UnsupportedMutation(_))
        ));
    }

    #[test]
    fn delete_all_without_filters_deletes_the_table() {
        let term = blog().compile_delete_all(&posts(), &[]).unwrap();
        assert_eq!(term, Term::table(None, "posts").delete());

        let q = posts().join(Join::assoc(Source::with_schema("users", "User")));
        assert!(matches!(blog().compile_delete_all(&q, &[]), Err(TranslateError::UnsupportedMutation(_))));
    }
}
