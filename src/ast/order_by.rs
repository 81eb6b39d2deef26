use crate::ast::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub direction: Direction,
    pub expr: Expr,
}

impl OrderBy {
    pub fn asc(expr: Expr) -> Self {
        Self { direction: Direction::Asc, expr }
    }

    pub fn desc(expr: Expr) -> Self {
        Self { direction: Direction::Desc, expr }
    }
}
