//! Operator compatibility table.
//!
//! For each operator the table holds a decision tree over the operand
//! types. Lookups walk the keys from left to right: an exact case is used
//! when one exists, otherwise the branch's default applies. Most pairs are
//! illegal, so only the legal combinations are spelled out.

use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;

use crate::ast::{
    expressions::{ArithOp, CompareOp},
    statements::AssignOp,
    types::TypeTag,
};

lazy_static! {
    /// Built once on first use and never modified.
    pub static ref TYPE_MAP: TypeMap = TypeMap::build();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Number(ArithOp),
    Elementwise(ArithOp),
    Compare(CompareOp),
    Assign(AssignOp),
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Number(op) => write!(f, "{}", op),
            Operator::Elementwise(op) => write!(f, ".{}", op),
            Operator::Compare(op) => write!(f, "{}", op),
            Operator::Assign(op) => write!(f, "{}", op),
        }
    }
}

/// One level of a lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Type(TypeTag),
    /// Assignment target that is a bare name
    Identifier,
    /// Assignment target that is an indexed element or slice
    Indexed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Type(TypeTag),
    /// The assignment is legal
    Bind,
    OpNotSupported,
    LeftInvalid,
    RightInvalid,
}

#[derive(Debug, Clone)]
pub enum Rule {
    Leaf(Outcome),
    Branch {
        cases: HashMap<Key, Rule>,
        default: Outcome,
    },
}

impl Rule {
    fn resolve(&self, keys: &[Key]) -> Outcome {
        match self {
            Rule::Leaf(outcome) => *outcome,
            Rule::Branch { cases, default } => match keys.split_first() {
                Some((key, rest)) => cases
                    .get(key)
                    .map(|rule| rule.resolve(rest))
                    .unwrap_or(*default),
                None => *default,
            },
        }
    }
}

#[derive(Debug)]
pub struct TypeMap {
    rules: HashMap<Operator, Rule>,
}

impl TypeMap {
    pub fn lookup(&self, operator: Operator, keys: &[Key]) -> Outcome {
        self.rules
            .get(&operator)
            .map(|rule| rule.resolve(keys))
            .unwrap_or(Outcome::OpNotSupported)
    }

    fn build() -> Self {
        let mut rules = HashMap::new();

        for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div] {
            rules.insert(Operator::Number(op), number_rule(op));
            rules.insert(Operator::Elementwise(op), elementwise_rule());
            rules.insert(Operator::Assign(AssignOp::Compound(op)), compound_assign_rule(op));
        }

        for op in [
            CompareOp::Less,
            CompareOp::Greater,
            CompareOp::LessEquals,
            CompareOp::GreaterEquals,
            CompareOp::Equals,
            CompareOp::NotEquals,
        ] {
            rules.insert(Operator::Compare(op), compare_rule());
        }

        rules.insert(Operator::Assign(AssignOp::Assign), assign_rule());

        TypeMap { rules }
    }
}

const ARRAY_LIKE: [TypeTag; 2] = [TypeTag::Array, TypeTag::TaintedArray];
const NON_NUMERIC: [TypeTag; 5] = [
    TypeTag::String,
    TypeTag::Bool,
    TypeTag::Range,
    TypeTag::Array,
    TypeTag::TaintedArray,
];

fn leaf(outcome: Outcome) -> Rule {
    Rule::Leaf(outcome)
}

fn ty(tag: TypeTag) -> Outcome {
    Outcome::Type(tag)
}

fn branch(cases: Vec<(TypeTag, Rule)>, default: Outcome) -> Rule {
    Rule::Branch {
        cases: cases
            .into_iter()
            .map(|(tag, rule)| (Key::Type(tag), rule))
            .collect(),
        default,
    }
}

/// `lhs` rows for the numeric part of `+ - * /`.
fn numeric_rows(op: ArithOp) -> Vec<(TypeTag, Rule)> {
    let mut int_row = vec![
        (TypeTag::Int, leaf(ty(TypeTag::Int))),
        (TypeTag::Float, leaf(ty(TypeTag::Float))),
        (TypeTag::Unknown, leaf(ty(TypeTag::Unknown))),
    ];
    if op == ArithOp::Mul {
        int_row.push((TypeTag::String, leaf(ty(TypeTag::String))));
    }

    let float_row = vec![
        (TypeTag::Int, leaf(ty(TypeTag::Float))),
        (TypeTag::Float, leaf(ty(TypeTag::Float))),
        (TypeTag::Unknown, leaf(ty(TypeTag::Unknown))),
    ];

    let mut string_row = vec![(TypeTag::Unknown, leaf(ty(TypeTag::Unknown)))];
    match op {
        ArithOp::Add => string_row.push((TypeTag::String, leaf(ty(TypeTag::String)))),
        ArithOp::Mul => string_row.push((TypeTag::Int, leaf(ty(TypeTag::String)))),
        ArithOp::Sub | ArithOp::Div => {}
    }

    vec![
        (TypeTag::Int, branch(int_row, Outcome::OpNotSupported)),
        (TypeTag::Float, branch(float_row, Outcome::OpNotSupported)),
        (TypeTag::String, branch(string_row, Outcome::OpNotSupported)),
        (TypeTag::Unknown, leaf(ty(TypeTag::Unknown))),
    ]
}

fn number_rule(op: ArithOp) -> Rule {
    let mut rows = numeric_rows(op);

    let array_row = if op == ArithOp::Mul {
        vec![
            (TypeTag::Array, leaf(ty(TypeTag::Array))),
            (TypeTag::TaintedArray, leaf(ty(TypeTag::Array))),
            (TypeTag::Unknown, leaf(ty(TypeTag::Unknown))),
        ]
    } else {
        vec![(TypeTag::Unknown, leaf(ty(TypeTag::Unknown)))]
    };
    for tag in ARRAY_LIKE {
        rows.push((tag, branch(array_row.clone(), Outcome::OpNotSupported)));
    }
    for tag in [TypeTag::Bool, TypeTag::Range] {
        rows.push((
            tag,
            branch(
                vec![(TypeTag::Unknown, leaf(ty(TypeTag::Unknown)))],
                Outcome::OpNotSupported,
            ),
        ));
    }

    branch(rows, Outcome::OpNotSupported)
}

fn elementwise_rule() -> Rule {
    let array_row = vec![
        (TypeTag::Array, leaf(ty(TypeTag::Array))),
        (TypeTag::TaintedArray, leaf(ty(TypeTag::Array))),
        (TypeTag::Unknown, leaf(ty(TypeTag::Unknown))),
    ];
    let unknown_only = vec![(TypeTag::Unknown, leaf(ty(TypeTag::Unknown)))];

    let mut rows = vec![(TypeTag::Unknown, leaf(ty(TypeTag::Unknown)))];
    for tag in ARRAY_LIKE {
        rows.push((tag, branch(array_row.clone(), Outcome::OpNotSupported)));
    }
    for tag in [TypeTag::Int, TypeTag::Float, TypeTag::String, TypeTag::Bool, TypeTag::Range] {
        rows.push((tag, branch(unknown_only.clone(), Outcome::OpNotSupported)));
    }

    branch(rows, Outcome::OpNotSupported)
}

fn compare_rule() -> Rule {
    let number_row = vec![
        (TypeTag::Int, leaf(ty(TypeTag::Bool))),
        (TypeTag::Float, leaf(ty(TypeTag::Bool))),
        (TypeTag::Unknown, leaf(ty(TypeTag::Bool))),
    ];
    let string_row = vec![
        (TypeTag::String, leaf(ty(TypeTag::Bool))),
        (TypeTag::Unknown, leaf(ty(TypeTag::Bool))),
    ];

    let mut rows = vec![
        (TypeTag::Int, branch(number_row.clone(), Outcome::OpNotSupported)),
        (TypeTag::Float, branch(number_row, Outcome::OpNotSupported)),
        (TypeTag::String, branch(string_row, Outcome::OpNotSupported)),
        (TypeTag::Unknown, leaf(ty(TypeTag::Bool))),
    ];
    for tag in [TypeTag::Bool, TypeTag::Range, TypeTag::Array, TypeTag::TaintedArray] {
        rows.push((
            tag,
            branch(
                vec![(TypeTag::Unknown, leaf(ty(TypeTag::Bool)))],
                Outcome::OpNotSupported,
            ),
        ));
    }

    branch(rows, Outcome::OpNotSupported)
}

/// Legal `value` types when writing into an indexed target whose current
/// type is the first key.
fn indexed_target_rows(compound: bool) -> Vec<(TypeTag, Rule)> {
    let scalar_row = branch(
        vec![
            (TypeTag::Int, leaf(Outcome::Bind)),
            (TypeTag::Float, leaf(Outcome::Bind)),
            (TypeTag::Unknown, leaf(Outcome::Bind)),
        ],
        Outcome::OpNotSupported,
    );

    let mut rows = vec![
        (TypeTag::Int, scalar_row.clone()),
        (TypeTag::Float, scalar_row),
        (TypeTag::Unknown, leaf(Outcome::Bind)),
    ];

    if compound {
        for tag in NON_NUMERIC {
            rows.push((tag, leaf(Outcome::OpNotSupported)));
        }
    } else {
        let array_row = branch(
            vec![
                (TypeTag::Array, leaf(Outcome::Bind)),
                (TypeTag::TaintedArray, leaf(Outcome::Bind)),
                (TypeTag::Unknown, leaf(Outcome::Bind)),
            ],
            Outcome::OpNotSupported,
        );
        for tag in ARRAY_LIKE {
            rows.push((tag, array_row.clone()));
        }
        rows.push((
            TypeTag::String,
            branch(
                vec![
                    (TypeTag::String, leaf(Outcome::Bind)),
                    (TypeTag::Unknown, leaf(Outcome::Bind)),
                ],
                Outcome::OpNotSupported,
            ),
        ));
    }

    rows
}

/// `=`: keys are `[target, value]` for names and
/// `[Indexed, target type, value]` for indexed targets.
fn assign_rule() -> Rule {
    let assignable = [
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::String,
        TypeTag::Array,
        TypeTag::TaintedArray,
        TypeTag::Unknown,
    ];
    let identifier = branch(
        assignable
            .into_iter()
            .map(|tag| (tag, leaf(Outcome::Bind)))
            .collect(),
        Outcome::RightInvalid,
    );

    let mut cases = HashMap::new();
    cases.insert(Key::Identifier, identifier);
    cases.insert(
        Key::Indexed,
        branch(indexed_target_rows(false), Outcome::LeftInvalid),
    );

    Rule::Branch {
        cases,
        default: Outcome::LeftInvalid,
    }
}

/// `+= -= *= /=`: keys are `[Identifier, current type, value]` or
/// `[Indexed, target type, value]`. For names the outcome is the type of
/// the updated variable.
fn compound_assign_rule(op: ArithOp) -> Rule {
    let mut cases = HashMap::new();
    cases.insert(
        Key::Identifier,
        branch(numeric_rows(op), Outcome::OpNotSupported),
    );
    cases.insert(
        Key::Indexed,
        branch(indexed_target_rows(true), Outcome::LeftInvalid),
    );

    Rule::Branch {
        cases,
        default: Outcome::LeftInvalid,
    }
}
