use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::term::TermType;

/// A node of the compiled pipeline.
///
/// The tree is opaque to the rest of the system: connectors serialize it with
/// [`Term::to_json`] (`[type, [args...], {optargs}]`) and send it to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Datum(Value),
    MakeArray(Vec<Term>),
    MakeObject(Vec<(String, Term)>),
    Var(u32),
    Func { params: Vec<u32>, body: Box<Term> },
    Op { kind: TermType, args: Vec<Term>, optargs: Vec<(String, Term)> },
}

impl Term {
    pub fn datum(value: impl Into<Value>) -> Self {
        Term::Datum(value.into())
    }

    pub fn op(kind: TermType, args: Vec<Term>) -> Self {
        Term::Op { kind, args, optargs: vec![] }
    }

    pub fn func(params: Vec<u32>, body: Term) -> Self {
        Term::Func { params, body: Box::new(body) }
    }

    /// Attach an optional argument; no-op on non-operation terms.
    pub fn with_optarg(mut self, key: &str, value: Term) -> Self {
        if let Term::Op { optargs, .. } = &mut self {
            optargs.push((key.to_string(), value));
        }
        self
    }

    pub fn kind(&self) -> TermType {
        match self {
            Term::Datum(_) => TermType::Datum,
            Term::MakeArray(_) => TermType::MakeArray,
            Term::MakeObject(_) => TermType::MakeObj,
            Term::Var(_) => TermType::Var,
            Term::Func { .. } => TermType::Func,
            Term::Op { kind, .. } => *kind,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Op { args, .. } | Term::MakeArray(args) => args,
            _ => &[],
        }
    }

    pub fn optarg(&self, key: &str) -> Option<&Term> {
        match self {
            Term::Op { optargs, .. } => optargs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    // ---- sources ----

    pub fn table(db: Option<&str>, name: &str) -> Self {
        match db {
            Some(db) => Term::op(TermType::Table, vec![Term::op(TermType::Db, vec![Term::datum(db)]), Term::datum(name)]),
            None => Term::op(TermType::Table, vec![Term::datum(name)]),
        }
    }

    pub fn get(self, key: Term) -> Self {
        Term::op(TermType::Get, vec![self, key])
    }

    // ---- document access ----

    pub fn bracket(self, field: &str) -> Self {
        Term::op(TermType::Bracket, vec![self, Term::datum(field)])
    }

    pub fn nth(self, index: usize) -> Self {
        Term::op(TermType::Nth, vec![self, Term::datum(index)])
    }

    pub fn append(self, item: Term) -> Self {
        Term::op(TermType::Append, vec![self, item])
    }

    pub fn difference(self, items: Term) -> Self {
        Term::op(TermType::Difference, vec![self, items])
    }

    pub fn contains(self, item: Term) -> Self {
        Term::op(TermType::Contains, vec![self, item])
    }

    pub fn matches(self, regex: &str) -> Self {
        Term::op(TermType::Match, vec![self, Term::datum(regex)])
    }

    // ---- sequence transforms ----

    pub fn filter(self, predicate: Term) -> Self {
        Term::op(TermType::Filter, vec![self, predicate])
    }

    pub fn map(self, func: Term) -> Self {
        Term::op(TermType::Map, vec![self, func])
    }

    pub fn concat_map(self, func: Term) -> Self {
        Term::op(TermType::ConcatMap, vec![self, func])
    }

    pub fn order_by(self, keys: Vec<Term>) -> Self {
        let mut args = Vec::with_capacity(keys.len() + 1);
        args.push(self);
        args.extend(keys);
        Term::op(TermType::OrderBy, args)
    }

    pub fn asc(key: Term) -> Self {
        Term::op(TermType::Asc, vec![key])
    }

    pub fn desc(key: Term) -> Self {
        Term::op(TermType::Desc, vec![key])
    }

    pub fn skip(self, n: Term) -> Self {
        Term::op(TermType::Skip, vec![self, n])
    }

    pub fn limit(self, n: Term) -> Self {
        Term::op(TermType::Limit, vec![self, n])
    }

    pub fn distinct(self) -> Self {
        Term::op(TermType::Distinct, vec![self])
    }

    pub fn group(self, func: Term) -> Self {
        Term::op(TermType::Group, vec![self, func])
    }

    pub fn ungroup(self) -> Self {
        Term::op(TermType::Ungroup, vec![self])
    }

    pub fn eq_join(self, left_key: Term, right: Term) -> Self {
        Term::op(TermType::EqJoin, vec![self, left_key, right])
    }

    pub fn inner_join(self, right: Term, predicate: Term) -> Self {
        Term::op(TermType::InnerJoin, vec![self, right, predicate])
    }

    // ---- reductions ----

    pub fn count(self) -> Self {
        Term::op(TermType::Count, vec![self])
    }

    pub fn sum(self) -> Self {
        Term::op(TermType::Sum, vec![self])
    }

    pub fn avg(self) -> Self {
        Term::op(TermType::Avg, vec![self])
    }

    pub fn min(self) -> Self {
        Term::op(TermType::Min, vec![self])
    }

    pub fn max(self) -> Self {
        Term::op(TermType::Max, vec![self])
    }

    // ---- writes ----

    pub fn insert(self, docs: Term) -> Self {
        Term::op(TermType::Insert, vec![self, docs])
    }

    pub fn update(self, patch: Term) -> Self {
        Term::op(TermType::Update, vec![self, patch])
    }

    pub fn delete(self) -> Self {
        Term::op(TermType::Delete, vec![self])
    }

    // ---- predicates ----

    pub fn binary(kind: TermType, left: Term, right: Term) -> Self {
        Term::op(kind, vec![left, right])
    }

    pub fn and(terms: Vec<Term>) -> Self {
        Term::op(TermType::And, terms)
    }

    pub fn or(terms: Vec<Term>) -> Self {
        Term::op(TermType::Or, terms)
    }

    pub fn not(term: Term) -> Self {
        Term::op(TermType::Not, vec![term])
    }

    /// Wire form: datums inline, everything else `[type, [args], {optargs}]`.
    pub fn to_json(&self) -> Value {
        match self {
            Term::Datum(v) => Self::datum_json(v),
            Term::MakeArray(items) => {
                let items: Vec<Value> = items.iter().map(Term::to_json).collect();
                Value::Array(vec![Value::from(TermType::MakeArray.code()), Value::Array(items)])
            }
            Term::MakeObject(entries) => {
                let mut m = Map::new();
                for (k, v) in entries {
                    m.insert(k.clone(), v.to_json());
                }
                Value::Object(m)
            }
            Term::Var(id) => Value::Array(vec![
                Value::from(TermType::Var.code()),
                Value::Array(vec![Value::from(*id)]),
            ]),
            Term::Func { params, body } => {
                let params: Vec<Value> = params.iter().map(|p| Value::from(*p)).collect();
                let params = Value::Array(vec![Value::from(TermType::MakeArray.code()), Value::Array(params)]);
                Value::Array(vec![
                    Value::from(TermType::Func.code()),
                    Value::Array(vec![params, body.to_json()]),
                ])
            }
            Term::Op { kind, args, optargs } => {
                let args: Vec<Value> = args.iter().map(Term::to_json).collect();
                let mut out = vec![Value::from(kind.code()), Value::Array(args)];
                if !optargs.is_empty() {
                    let mut m = Map::new();
                    for (k, v) in optargs {
                        m.insert(k.clone(), v.to_json());
                    }
                    out.push(Value::Object(m));
                }
                Value::Array(out)
            }
        }
    }

    // Arrays are not literal on the wire, they have to be wrapped in MAKE_ARRAY.
    fn datum_json(v: &Value) -> Value {
        match v {
            Value::Array(items) => Value::Array(vec![
                Value::from(TermType::MakeArray.code()),
                Value::Array(items.iter().map(Self::datum_json).collect()),
            ]),
            Value::Object(m) => Value::Object(m.iter().map(|(k, v)| (k.clone(), Self::datum_json(v))).collect()),
            other => other.clone(),
        }
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
