//! Edge case tests for propagation and classification
//!
//! - Allocator variants (calloc, realloc, custom)
//! - Pointer copies and reassignment
//! - Branch narrowing, infeasible and unreachable code
//! - Iteration cap on nested loops
//! - Structurally invalid CFGs

use heapbounds_ir::{
    AnalysisError, BasicBlock, BoundsAnalysisService, BoundsConfig, ComparisonOp, Condition,
    Expr, Function, FunctionReport, Span, Statement, StraddlePolicy, SymbolicValue, Terminator,
    Verdict,
};

fn analyze_with(config: BoundsConfig, function: &Function) -> FunctionReport {
    BoundsAnalysisService::new(config.report_in_bounds(true))
        .unwrap()
        .analyze_function(function)
        .unwrap()
}

fn analyze(function: &Function) -> FunctionReport {
    analyze_with(BoundsConfig::default(), function)
}

/// Verdicts of the reported findings, by line
fn verdicts(report: &FunctionReport) -> Vec<(u32, Verdict)> {
    report
        .findings
        .iter()
        .map(|f| (f.line(), f.verdict))
        .collect()
}

fn single_block(name: &str, statements: Vec<Statement>) -> Function {
    Function::new(name, "entry").with_block(BasicBlock::new("entry", statements, Terminator::Return))
}

fn alloc(target: &str, callee: &str, args: Vec<Expr>, line: u32) -> Statement {
    Statement::assign(target, Expr::call(callee, args), Span::at(line, 4))
}

fn access(base: &str, index: Expr, line: u32) -> Statement {
    Statement::access(base, index, Span::at(line, 4))
}

// ========================================
// Allocators
// ========================================

#[test]
fn test_calloc_size_is_product() {
    let f = single_block(
        "calloc_const",
        vec![
            alloc("buf", "calloc", vec![Expr::constant(10), Expr::constant(4)], 1),
            access("buf", Expr::constant(39), 2),
            access("buf", Expr::constant(40), 3),
        ],
    );
    let report = analyze(&f);

    assert_eq!(report.allocations[0].size, SymbolicValue::constant(40));
    assert_eq!(
        verdicts(&report),
        vec![(2, Verdict::InBounds), (3, Verdict::OutOfBounds)]
    );
}

#[test]
fn test_calloc_with_range_count_is_unknown() {
    let f = single_block(
        "calloc_range",
        vec![
            Statement::assign(
                "n",
                Expr::select(Expr::constant(2), Expr::constant(4)),
                Span::at(1, 4),
            ),
            alloc("buf", "calloc", vec![Expr::var("n"), Expr::constant(8)], 2),
            access("buf", Expr::constant(100), 3),
        ],
    );
    let report = analyze(&f);

    assert_eq!(report.allocations[0].size, SymbolicValue::Unknown);
    assert!(report.findings.is_empty());
    assert_eq!(report.summary.indeterminate, 1);
}

#[test]
fn test_realloc_takes_second_argument() {
    let f = single_block(
        "grow",
        vec![
            alloc("buf", "malloc", vec![Expr::constant(10)], 1),
            alloc("bigger", "realloc", vec![Expr::var("buf"), Expr::constant(20)], 2),
            access("bigger", Expr::constant(15), 3),
            access("bigger", Expr::constant(20), 4),
        ],
    );
    let report = analyze(&f);

    assert_eq!(report.allocations.len(), 2);
    assert_eq!(report.allocations[1].size, SymbolicValue::constant(20));
    assert_eq!(
        verdicts(&report),
        vec![(3, Verdict::InBounds), (4, Verdict::OutOfBounds)]
    );
}

#[test]
fn test_custom_allocator_requires_config() {
    let f = single_block(
        "pool",
        vec![
            alloc("buf", "pool_alloc", vec![Expr::constant(8)], 1),
            access("buf", Expr::constant(8), 2),
        ],
    );

    assert!(analyze(&f).findings.is_empty());

    let report = analyze_with(BoundsConfig::default().allocator("pool_alloc"), &f);
    assert_eq!(verdicts(&report), vec![(2, Verdict::OutOfBounds)]);
}

#[test]
fn test_allocator_without_arguments_has_unknown_size() {
    let f = single_block(
        "no_args",
        vec![
            alloc("buf", "malloc", vec![], 1),
            access("buf", Expr::constant(0), 2),
        ],
    );
    let report = analyze(&f);

    assert_eq!(report.allocations.len(), 1);
    assert!(!report.allocations[0].is_size_known());
    assert!(report.findings.is_empty());
}

// ========================================
// Pointers
// ========================================

#[test]
fn test_pointer_copy_survives_source_reassignment() {
    let f = single_block(
        "alias",
        vec![
            alloc("buf", "malloc", vec![Expr::constant(16)], 1),
            Statement::assign("alias", Expr::var("buf"), Span::at(2, 4)),
            Statement::assign("buf", Expr::constant(0), Span::at(3, 4)),
            access("alias", Expr::constant(16), 4),
            access("buf", Expr::constant(16), 5),
        ],
    );
    let report = analyze(&f);

    // `buf` is now untracked; only the alias is classified
    assert_eq!(verdicts(&report), vec![(4, Verdict::OutOfBounds)]);
    assert_eq!(report.summary.indeterminate, 1);
}

#[test]
fn test_access_through_untracked_pointer() {
    let f = single_block("param", vec![access("param", Expr::constant(1_000_000), 1)]);
    let report = analyze(&f);

    assert!(report.findings.is_empty());
    assert_eq!(report.summary.indeterminate, 1);
}

#[test]
fn test_pointers_joined_across_paths() {
    let f = Function::new("either", "entry")
        .with_block(BasicBlock::new(
            "entry",
            vec![],
            Terminator::branch(None, "small", "large"),
        ))
        .with_block(BasicBlock::new(
            "small",
            vec![alloc("buf", "malloc", vec![Expr::constant(10)], 2)],
            Terminator::goto("join"),
        ))
        .with_block(BasicBlock::new(
            "large",
            vec![alloc("buf", "malloc", vec![Expr::constant(20)], 3)],
            Terminator::goto("join"),
        ))
        .with_block(BasicBlock::new(
            "join",
            vec![
                access("buf", Expr::constant(9), 5),
                access("buf", Expr::constant(15), 6),
                access("buf", Expr::constant(20), 7),
            ],
            Terminator::Return,
        ));

    let report = analyze(&f);
    assert_eq!(report.allocations.len(), 2);
    assert_eq!(
        verdicts(&report),
        vec![(5, Verdict::InBounds), (7, Verdict::OutOfBounds)]
    );

    let report = analyze_with(
        BoundsConfig::default().straddle_policy(StraddlePolicy::ReportMayOverflow),
        &f,
    );
    // 15 is valid for the larger buffer and never exceeds it
    assert!(!verdicts(&report).contains(&(6, Verdict::OutOfBounds)));
}

#[test]
fn test_negative_index_is_out_of_bounds() {
    let f = single_block(
        "negative",
        vec![
            alloc("buf", "malloc", vec![Expr::constant(4)], 1),
            access("buf", Expr::sub(Expr::constant(0), Expr::constant(1)), 2),
        ],
    );
    assert_eq!(verdicts(&analyze(&f)), vec![(2, Verdict::OutOfBounds)]);
}

#[test]
fn test_opaque_index_is_indeterminate() {
    let f = single_block(
        "opaque",
        vec![
            alloc("buf", "malloc", vec![Expr::constant(4)], 1),
            Statement::eval(Expr::call("shuffle", vec![Expr::var("buf")]), Span::at(2, 4)),
            access("buf", Expr::call("rand", vec![]), 3),
            access("buf", Expr::unmodeled("i * 2"), 4),
            access("buf", Expr::constant(3), 5),
        ],
    );
    let report = analyze(&f);

    assert_eq!(verdicts(&report), vec![(5, Verdict::InBounds)]);
    assert_eq!(report.summary.indeterminate, 2);
}

// ========================================
// Control flow
// ========================================

fn guarded(narrowing: bool) -> FunctionReport {
    let f = Function::new("guarded", "entry")
        .with_block(BasicBlock::new(
            "entry",
            vec![
                alloc("buf", "malloc", vec![Expr::constant(10)], 1),
                Statement::assign(
                    "idx",
                    Expr::select(Expr::constant(5), Expr::constant(50)),
                    Span::at(2, 4),
                ),
            ],
            Terminator::branch(
                Some(Condition::new("idx", ComparisonOp::Lt, Expr::constant(10))),
                "inside",
                "outside",
            ),
        ))
        .with_block(BasicBlock::new(
            "inside",
            vec![access("buf", Expr::var("idx"), 4)],
            Terminator::Return,
        ))
        .with_block(BasicBlock::new(
            "outside",
            vec![access("buf", Expr::var("idx"), 6)],
            Terminator::Return,
        ));

    analyze_with(BoundsConfig::default().branch_narrowing(narrowing), &f)
}

#[test]
fn test_branch_narrowing_splits_range() {
    assert_eq!(
        verdicts(&guarded(true)),
        vec![(4, Verdict::InBounds), (6, Verdict::OutOfBounds)]
    );
}

#[test]
fn test_without_narrowing_range_straddles() {
    let report = guarded(false);
    assert!(report.findings.is_empty());
    assert_eq!(report.summary.indeterminate, 2);
}

#[test]
fn test_infeasible_branch_is_not_reported() {
    let f = Function::new("dead_arm", "entry")
        .with_block(BasicBlock::new(
            "entry",
            vec![
                alloc("buf", "malloc", vec![Expr::constant(10)], 1),
                Statement::assign("mode", Expr::constant(5), Span::at(2, 4)),
            ],
            Terminator::branch(
                Some(Condition::new("mode", ComparisonOp::Eq, Expr::constant(3))),
                "never",
                "always",
            ),
        ))
        .with_block(BasicBlock::new(
            "never",
            vec![access("buf", Expr::constant(100), 4)],
            Terminator::Return,
        ))
        .with_block(BasicBlock::new(
            "always",
            vec![access("buf", Expr::constant(1), 6)],
            Terminator::Return,
        ));

    let report = analyze(&f);
    assert_eq!(verdicts(&report), vec![(6, Verdict::InBounds)]);
    assert_eq!(report.stats.blocks, 3);
    assert_eq!(report.stats.reached_blocks, 2);
}

#[test]
fn test_unreachable_block_is_ignored() {
    let f = Function::new("orphan", "entry")
        .with_block(BasicBlock::new(
            "entry",
            vec![
                alloc("buf", "malloc", vec![Expr::constant(10)], 1),
                access("buf", Expr::constant(0), 2),
            ],
            Terminator::Return,
        ))
        .with_block(BasicBlock::new(
            "orphan",
            vec![access("buf", Expr::constant(100), 4)],
            Terminator::goto("orphan"),
        ));

    let report = analyze(&f);
    assert_eq!(verdicts(&report), vec![(2, Verdict::InBounds)]);
    assert_eq!(report.stats.reached_blocks, 1);
}

#[test]
fn test_nested_loops_terminate_under_small_cap() {
    // for (;;) for (j = 0; j < 1000; j++) buf[j];
    let f = Function::new("nested", "entry")
        .with_block(BasicBlock::new(
            "entry",
            vec![alloc("buf", "malloc", vec![Expr::constant(1000)], 1)],
            Terminator::goto("outer"),
        ))
        .with_block(BasicBlock::new(
            "outer",
            vec![Statement::assign("j", Expr::constant(0), Span::at(3, 8))],
            Terminator::goto("inner"),
        ))
        .with_block(BasicBlock::new(
            "inner",
            vec![],
            Terminator::branch(
                Some(Condition::new("j", ComparisonOp::Lt, Expr::constant(1000))),
                "body",
                "latch",
            ),
        ))
        .with_block(BasicBlock::new(
            "body",
            vec![
                access("buf", Expr::var("j"), 5),
                Statement::assign(
                    "j",
                    Expr::add(Expr::var("j"), Expr::constant(1)),
                    Span::at(6, 12),
                ),
            ],
            Terminator::goto("inner"),
        ))
        .with_block(BasicBlock::new("latch", vec![], Terminator::goto("outer")));

    let report = analyze_with(BoundsConfig::default().max_fixpoint_iterations(4), &f);

    assert!(report
        .stats
        .widened_blocks
        .iter()
        .any(|block| block == "inner"));
    // `j` went to unknown at the loop head, so the access is no longer provable
    assert!(report.findings.is_empty());
    assert_eq!(report.summary.indeterminate, 1);

    // A large enough cap proves it
    let report = analyze_with(BoundsConfig::default().max_fixpoint_iterations(5000), &f);
    assert!(report.stats.widened_blocks.is_empty());
    assert_eq!(verdicts(&report), vec![(5, Verdict::InBounds)]);
}

#[test]
fn test_self_loop_on_entry() {
    let f = Function::new("spin", "entry")
        .with_block(BasicBlock::new(
            "entry",
            vec![Statement::assign(
                "n",
                Expr::add(Expr::var("n"), Expr::constant(1)),
                Span::at(1, 4),
            )],
            Terminator::branch(None, "entry", "done"),
        ))
        .with_block(BasicBlock::new("done", vec![], Terminator::Return));

    let report = analyze_with(BoundsConfig::default().max_fixpoint_iterations(2), &f);
    assert_eq!(report.stats.reached_blocks, 2);
}

// ========================================
// Invalid CFGs
// ========================================

#[test]
fn test_duplicate_block_id_rejected() {
    let f = Function::new("dup", "entry")
        .with_block(BasicBlock::new("entry", vec![], Terminator::Return))
        .with_block(BasicBlock::new("entry", vec![], Terminator::Return));

    let err = BoundsAnalysisService::new(BoundsConfig::default())
        .unwrap()
        .analyze_function(&f)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidCfg(ref msg) if msg.contains("duplicate")));
}

#[test]
fn test_missing_entry_rejected() {
    let f = Function::new("no_entry", "start")
        .with_block(BasicBlock::new("entry", vec![], Terminator::Return));

    let err = BoundsAnalysisService::new(BoundsConfig::default())
        .unwrap()
        .analyze_function(&f)
        .unwrap_err();
    assert!(err.to_string().contains("start"));
}

#[test]
fn test_program_error_names_function() {
    let good = single_block("good", vec![]);
    let bad = Function::new("bad", "entry")
        .with_block(BasicBlock::new("entry", vec![], Terminator::goto("nowhere")));

    let err = BoundsAnalysisService::new(BoundsConfig::default())
        .unwrap()
        .analyze_program(&[good, bad])
        .unwrap_err();
    assert!(err.to_string().contains("bad"));
    assert!(err.to_string().contains("nowhere"));
}
