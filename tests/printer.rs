use aroi::interpreter::parse;
use aroi::lexer::scan;
use aroi::printer::{print_expr, print_stmt, read_expr};
use aroi::Stmt;

fn printed_statements(source: &str) -> Vec<String> {
    let result = parse(scan(source).tokens);
    assert!(result.is_ok(), "parse errors: {:?}", result.errors);
    result.statements.iter().map(print_stmt).collect()
}

#[test]
fn test_program_prints_in_prefix_form() {
    let source = r#"
        var name = "aroi";
        if (name != nil) { scream "hi " + name; } else scream 0;
        while (false) name = name * 2;
    "#;
    assert_eq!(
        printed_statements(source),
        vec![
            r#"(var name "aroi")"#,
            r#"(if (!= name nil) (block (scream (+ "hi " name))) (scream 0))"#,
            "(while false (; (= name (* name 2))))",
        ]
    );
}

#[test]
fn test_printed_expressions_read_back_to_the_same_tree() {
    let sources = [
        "3 + 4 * 5",
        "(3 + 4) * 5",
        "-x <= -(y - 1)",
        "a = b == c or !d and e > 2.5",
        "\"str\" * 3 + nil",
    ];
    for source in sources {
        let result = parse(scan(&format!("{};", source)).tokens);
        let Some(Stmt::Expression(expr)) = result.statements.first() else {
            panic!("Expected expression statement for {}", source);
        };

        let printed = print_expr(expr);
        let reread = read_expr(&printed).unwrap();
        assert_eq!(print_expr(&reread), printed);
    }
}

#[test]
fn test_read_expr_reports_scan_errors() {
    let error = read_expr("(+ 1 @)").unwrap_err();
    assert_eq!(error.message, "Unexpected character.");
}
