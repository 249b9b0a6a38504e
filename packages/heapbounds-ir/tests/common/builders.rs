//! Test data builders
//!
//! IR for the functions of the annotated fixture, lowered by hand the way a
//! front-end would, with spans taken from the fixture text.

use super::annotations::AnnotatedSource;
use heapbounds_ir::{
    BasicBlock, ComparisonOp, Condition, Expr, Function, Span, Statement, Terminator,
};

/// Builder for a single-function CFG
#[derive(Debug)]
pub struct FunctionBuilder {
    function: Function,
}

impl FunctionBuilder {
    pub fn new(name: &str, entry: &str) -> Self {
        Self {
            function: Function::new(name, entry),
        }
    }

    /// Add a block
    pub fn block(mut self, id: &str, statements: Vec<Statement>, terminator: Terminator) -> Self {
        self.function = self
            .function
            .with_block(BasicBlock::new(id, statements, terminator));
        self
    }

    pub fn build(self) -> Function {
        self.function
    }
}

/// `buf = malloc(size)`
pub fn malloc(target: &str, size: Expr, span: Span) -> Statement {
    Statement::assign(target, Expr::call("malloc", vec![size]), span)
}

/// Fixture-backed statement helpers for one C function
pub struct FixtureScope<'a> {
    source: &'a AnnotatedSource,
    function: &'a str,
}

impl<'a> FixtureScope<'a> {
    pub fn new(source: &'a AnnotatedSource, function: &'a str) -> Self {
        Self { source, function }
    }

    pub fn span(&self, needle: &str) -> Span {
        self.source.span_of(self.function, needle)
    }

    /// `base[index]` located at the line containing `needle`
    pub fn access(&self, base: &str, index: Expr, needle: &str) -> Statement {
        Statement::access(base, index, self.span(needle))
    }

    pub fn assign(&self, target: &str, value: Expr, needle: &str) -> Statement {
        Statement::assign(target, value, self.span(needle))
    }
}

fn size_minus_one(var: &str) -> Expr {
    Expr::sub(Expr::var(var), Expr::constant(1))
}

/// `test_const`: constant allocation size
pub fn build_test_const(source: &AnnotatedSource) -> Function {
    let s = FixtureScope::new(source, "test_const");
    FunctionBuilder::new("test_const", "entry")
        .block(
            "entry",
            vec![
                malloc("buf", Expr::constant(100), s.span("malloc(100)")),
                s.access("buf", Expr::constant(0), "buf[0];"),
                s.access("buf", Expr::constant(99), "buf[99];"),
                s.access("buf", Expr::constant(100), "buf[100];"),
            ],
            Terminator::Return,
        )
        .build()
}

/// `test_const_var`: size held in a variable
pub fn build_test_const_var(source: &AnnotatedSource) -> Function {
    let s = FixtureScope::new(source, "test_const_var");
    FunctionBuilder::new("test_const_var", "entry")
        .block(
            "entry",
            vec![
                s.assign("size", Expr::constant(100), "size = 100;"),
                malloc("buf", Expr::var("size"), s.span("malloc(size)")),
                s.access("buf", Expr::constant(0), "buf[0];"),
                s.access("buf", Expr::constant(99), "buf[99];"),
                s.access("buf", size_minus_one("size"), "buf[size - 1];"),
                s.access("buf", Expr::constant(100), "buf[100];"),
                s.access("buf", Expr::var("size"), "buf[size];"),
            ],
            Terminator::Return,
        )
        .build()
}

/// `test_const_branch`: size joined over a ternary, then grown after the
/// allocation on one path
pub fn build_test_const_branch(source: &AnnotatedSource) -> Function {
    let s = FixtureScope::new(source, "test_const_branch");
    FunctionBuilder::new("test_const_branch", "entry")
        .block(
            "entry",
            vec![
                s.assign(
                    "size",
                    Expr::select(Expr::constant(100), Expr::constant(200)),
                    "size = (mode == 1 ? 100 : 200);",
                ),
                malloc("buf", Expr::var("size"), s.span("malloc(size)")),
            ],
            Terminator::branch(
                Some(Condition::new(
                    "random_condition",
                    ComparisonOp::Neq,
                    Expr::constant(0),
                )),
                "grow",
                "use",
            ),
        )
        .block(
            "grow",
            vec![s.assign("size", Expr::constant(300), "size = 300;")],
            Terminator::goto("use"),
        )
        .block(
            "use",
            vec![
                s.access("buf", Expr::constant(0), "buf[0];"),
                s.access("buf", Expr::constant(99), "buf[99];"),
                s.access("buf", size_minus_one("size"), "buf[size - 1];"),
                s.access("buf", Expr::constant(100), "buf[100];"),
                s.access("buf", Expr::var("size"), "buf[size];"),
            ],
            Terminator::Return,
        )
        .build()
}

/// `test_const_branch2`: allocation size unknown on one path
pub fn build_test_const_branch2(source: &AnnotatedSource) -> Function {
    let s = FixtureScope::new(source, "test_const_branch2");
    FunctionBuilder::new("test_const_branch2", "entry")
        .block(
            "entry",
            vec![s.assign("alloc_size", Expr::constant(0), "alloc_size = 0;")],
            Terminator::branch(
                Some(Condition::new("mode", ComparisonOp::Eq, Expr::constant(1))),
                "then",
                "else",
            ),
        )
        .block(
            "then",
            vec![s.assign("alloc_size", Expr::constant(200), "alloc_size = 200;")],
            Terminator::goto("join"),
        )
        .block(
            "else",
            vec![s.assign(
                "alloc_size",
                Expr::call("extern_get_size", vec![]),
                "alloc_size = extern_get_size();",
            )],
            Terminator::goto("join"),
        )
        .block(
            "join",
            vec![
                malloc("buf", Expr::var("alloc_size"), s.span("malloc(alloc_size)")),
                s.access("buf", Expr::constant(0), "buf[0];"),
                s.access("buf", Expr::constant(100), "buf[100];"),
                s.access("buf", Expr::constant(200), "buf[200];"),
                s.access("buf", size_minus_one("alloc_size"), "buf[alloc_size - 1];"),
                s.access("buf", Expr::var("alloc_size"), "buf[alloc_size];"),
            ],
            Terminator::Return,
        )
        .build()
}

/// Every fixture function, in source order
pub fn fixture_functions(source: &AnnotatedSource) -> Vec<Function> {
    vec![
        build_test_const(source),
        build_test_const_var(source),
        build_test_const_branch(source),
        build_test_const_branch2(source),
    ]
}

/// `buf = malloc(capacity); for (i = 0; i < bound; i++) buf[i];`
pub fn counting_loop(name: &str, capacity: i64, bound: i64) -> Function {
    FunctionBuilder::new(name, "entry")
        .block(
            "entry",
            vec![
                malloc("buf", Expr::constant(capacity), Span::at(1, 4)),
                Statement::assign("i", Expr::constant(0), Span::at(2, 4)),
            ],
            Terminator::goto("head"),
        )
        .block(
            "head",
            vec![],
            Terminator::branch(
                Some(Condition::new("i", ComparisonOp::Lt, Expr::constant(bound))),
                "body",
                "exit",
            ),
        )
        .block(
            "body",
            vec![
                Statement::access("buf", Expr::var("i"), Span::at(3, 8)),
                Statement::assign(
                    "i",
                    Expr::add(Expr::var("i"), Expr::constant(1)),
                    Span::at(4, 8),
                ),
            ],
            Terminator::goto("head"),
        )
        .block("exit", vec![], Terminator::Return)
        .build()
}
