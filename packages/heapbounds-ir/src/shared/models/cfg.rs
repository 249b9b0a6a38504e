//! Control Flow Graph types
//!
//! The per-function IR the analyzer consumes. A front-end lowers source code
//! into this form; every field is serde-serializable so the IR can be handed
//! over as JSON.
//!
//! ```text
//! char *buf = malloc(size);   →  Assign { target: "buf", value: Call("malloc", [Var("size")]) }
//! buf[size - 1];              →  Access { base: "buf", index: Sub(Var("size"), Const(1)) }
//! if (x < 10) { .. }          →  Branch { condition: Some(x < 10), then_block, else_block }
//! ```

use crate::shared::models::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variable identifier
pub type VarId = String;

/// Basic block identifier (unique per function)
pub type BlockId = String;

/// Integer expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Integer literal
    Const { value: i64 },
    /// Variable read
    Var { name: VarId },
    /// `lhs + rhs`
    Add { lhs: Box<Expr>, rhs: Box<Expr> },
    /// `lhs - rhs`
    Sub { lhs: Box<Expr>, rhs: Box<Expr> },
    /// `cond ? then : otherwise` where the condition is not modeled
    Select {
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Function call. Allocator calls are recognised by name, everything
    /// else is opaque.
    Call { callee: String, args: Vec<Expr> },
    /// Any construct the front-end could not lower (kept for diagnostics)
    Unmodeled { text: String },
}

impl Expr {
    pub fn constant(value: i64) -> Self {
        Expr::Const { value }
    }

    pub fn var(name: impl Into<VarId>) -> Self {
        Expr::Var { name: name.into() }
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Expr::Add {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Self {
        Expr::Sub {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn select(then: Expr, otherwise: Expr) -> Self {
        Expr::Select {
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.into(),
            args,
        }
    }

    pub fn unmodeled(text: impl Into<String>) -> Self {
        Expr::Unmodeled { text: text.into() }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const { value } => write!(f, "{}", value),
            Expr::Var { name } => write!(f, "{}", name),
            Expr::Add { lhs, rhs } => write!(f, "{} + {}", lhs, rhs),
            Expr::Sub { lhs, rhs } => write!(f, "{} - {}", lhs, rhs),
            Expr::Select { then, otherwise } => write!(f, "? {} : {}", then, otherwise),
            Expr::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Unmodeled { text } => write!(f, "<{}>", text),
        }
    }
}

/// Comparison operators for branch conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    /// Operator that holds on the false edge
    pub fn negate(self) -> Self {
        match self {
            ComparisonOp::Eq => ComparisonOp::Neq,
            ComparisonOp::Neq => ComparisonOp::Eq,
            ComparisonOp::Lt => ComparisonOp::Ge,
            ComparisonOp::Le => ComparisonOp::Gt,
            ComparisonOp::Gt => ComparisonOp::Le,
            ComparisonOp::Ge => ComparisonOp::Lt,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Neq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

/// Branch condition `var <op> value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub var: VarId,
    pub op: ComparisonOp,
    pub value: Expr,
}

impl Condition {
    pub fn new(var: impl Into<VarId>, op: ComparisonOp, value: Expr) -> Self {
        Self {
            var: var.into(),
            op,
            value,
        }
    }
}

/// Statement inside a basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// `target = value`
    Assign {
        target: VarId,
        value: Expr,
        span: Span,
    },
    /// `base[index]`
    Access {
        base: VarId,
        index: Expr,
        span: Span,
    },
    /// Expression evaluated for its side effects (e.g. a bare call)
    Eval { expr: Expr, span: Span },
}

impl Statement {
    pub fn assign(target: impl Into<VarId>, value: Expr, span: Span) -> Self {
        Statement::Assign {
            target: target.into(),
            value,
            span,
        }
    }

    pub fn access(base: impl Into<VarId>, index: Expr, span: Span) -> Self {
        Statement::Access {
            base: base.into(),
            index,
            span,
        }
    }

    pub fn eval(expr: Expr, span: Span) -> Self {
        Statement::Eval { expr, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::Assign { span, .. }
            | Statement::Access { span, .. }
            | Statement::Eval { span, .. } => *span,
        }
    }
}

/// Block terminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Terminator {
    /// Unconditional jump
    Goto { target: BlockId },
    /// Two-way branch. `condition: None` for conditions the front-end did not
    /// lower into `var <op> value` form.
    Branch {
        condition: Option<Condition>,
        then_block: BlockId,
        else_block: BlockId,
    },
    /// Function exit
    Return,
}

impl Terminator {
    pub fn goto(target: impl Into<BlockId>) -> Self {
        Terminator::Goto {
            target: target.into(),
        }
    }

    pub fn branch(
        condition: Option<Condition>,
        then_block: impl Into<BlockId>,
        else_block: impl Into<BlockId>,
    ) -> Self {
        Terminator::Branch {
            condition,
            then_block: then_block.into(),
            else_block: else_block.into(),
        }
    }

    /// Successor block IDs in edge order
    pub fn successors(&self) -> Vec<&BlockId> {
        match self {
            Terminator::Goto { target } => vec![target],
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => vec![then_block, else_block],
            Terminator::Return => Vec::new(),
        }
    }
}

/// CFG basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    /// Unique block ID
    pub id: BlockId,
    /// Statements in execution order
    pub statements: Vec<Statement>,
    pub terminator: Terminator,
}

impl BasicBlock {
    pub fn new(id: impl Into<BlockId>, statements: Vec<Statement>, terminator: Terminator) -> Self {
        Self {
            id: id.into(),
            statements,
            terminator,
        }
    }
}

/// One function's control flow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Entry block ID
    pub entry: BlockId,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(name: impl Into<String>, entry: impl Into<BlockId>) -> Self {
        Self {
            name: name.into(),
            entry: entry.into(),
            blocks: Vec::new(),
        }
    }

    /// Builder: append a block
    pub fn with_block(mut self, block: BasicBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn block(&self, id: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }
}
