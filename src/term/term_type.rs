/// Wire codes of the pipeline operations this crate emits.
///
/// Codes follow the ReQL protocol definition so a finished term can be sent
/// as-is by a connector speaking that protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TermType {
    Datum = 1,
    MakeArray = 2,
    MakeObj = 3,
    Var = 10,
    Db = 14,
    Table = 15,
    Get = 16,
    Eq = 17,
    Ne = 18,
    Lt = 19,
    Le = 20,
    Gt = 21,
    Ge = 22,
    Not = 23,
    Add = 24,
    Sub = 25,
    Mul = 26,
    Div = 27,
    Append = 29,
    Map = 38,
    Filter = 39,
    ConcatMap = 40,
    OrderBy = 41,
    Distinct = 42,
    Count = 43,
    Nth = 45,
    InnerJoin = 48,
    EqJoin = 50,
    Update = 53,
    Delete = 54,
    Insert = 56,
    Or = 66,
    And = 67,
    Func = 69,
    Skip = 70,
    Limit = 71,
    Asc = 73,
    Desc = 74,
    Contains = 93,
    Difference = 95,
    Match = 97,
    Group = 144,
    Sum = 145,
    Avg = 146,
    Min = 147,
    Max = 148,
    Ungroup = 150,
    Bracket = 170,
}

impl TermType {
    pub fn code(self) -> u32 {
        self as u32
    }
}
