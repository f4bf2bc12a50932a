use crate::types::{RawResult, Value};

/// How a command's result is shaped. Chosen per command call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Affected-row count.
    Exec,
    /// First tuple.
    Row,
    /// Every tuple.
    AllRows,
    /// Position 0 of every tuple.
    Column,
    /// Position 0 of the first tuple.
    Scalar,
}

/// A raw result shaped for one fetch mode. Tuples stay positional; naming
/// them is the query layer's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Affected(u64),
    Row(Option<Vec<Value>>),
    Rows(Vec<Vec<Value>>),
    Column(Vec<Value>),
    Scalar(Option<Value>),
}

impl Decoded {
    pub fn rows_affected(self) -> u64 {
        match self {
            Decoded::Affected(n) => n,
            _ => 0,
        }
    }

    pub fn into_row(self) -> Option<Vec<Value>> {
        match self {
            Decoded::Row(row) => row,
            _ => None,
        }
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        match self {
            Decoded::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }

    pub fn into_column(self) -> Vec<Value> {
        match self {
            Decoded::Column(values) => values,
            _ => Vec::new(),
        }
    }

    pub fn into_scalar(self) -> Option<Value> {
        match self {
            Decoded::Scalar(value) => value,
            _ => None,
        }
    }
}

pub fn decode(raw: RawResult, mode: FetchMode) -> Decoded {
    match mode {
        FetchMode::Exec => Decoded::Affected(affected(&raw)),
        FetchMode::Row => Decoded::Row(into_rows(raw).into_iter().next()),
        FetchMode::AllRows => Decoded::Rows(into_rows(raw)),
        FetchMode::Column => Decoded::Column(
            into_rows(raw)
                .into_iter()
                .map(|row| row.into_iter().next().unwrap_or(Value::Null))
                .collect(),
        ),
        FetchMode::Scalar => Decoded::Scalar(
            into_rows(raw)
                .into_iter()
                .next()
                .and_then(|row| row.into_iter().next()),
        ),
    }
}

fn affected(raw: &RawResult) -> u64 {
    match raw {
        RawResult::Done => 0,
        RawResult::Affected(n) => *n,
        RawResult::Rows(rows) => rows.len() as u64,
    }
}

fn into_rows(raw: RawResult) -> Vec<Vec<Value>> {
    match raw {
        RawResult::Rows(rows) => rows,
        RawResult::Done | RawResult::Affected(_) => Vec::new(),
    }
}
