//! Render a tree back to canonical source.
//!
//! The output re-parses, in the same family, to a structurally
//! equivalent tree. Operands that are themselves operations are
//! parenthesized, so precedence never has to be reconstructed.
//!
//! Loop counts below zero (possible via the brace family's `for`
//! lowering) print as `0`; both forms run the body zero times.

use std::fmt::Write;

use autodrone_core::Value;

use crate::ast::{BinOp, Block, ElseBranch, Expr, MoveDir, Program, Stmt, UnOp};
use crate::SyntaxFamily;

/// Render `program` as canonical source in the given family.
pub fn unparse(family: SyntaxFamily, program: &Program) -> String {
    let mut out = String::new();
    for stmt in &program.body {
        write_stmt(&mut out, family, stmt, 0);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_block(out: &mut String, family: SyntaxFamily, block: &Block, depth: usize) {
    for stmt in &block.statements {
        write_stmt(out, family, stmt, depth);
    }
}

fn write_stmt(out: &mut String, family: SyntaxFamily, stmt: &Stmt, depth: usize) {
    indent(out, depth);
    match family {
        SyntaxFamily::Block => write_block_stmt(out, stmt, depth),
        SyntaxFamily::Brace => write_brace_stmt(out, stmt, depth),
    }
}

// ── Block family ────────────────────────────────────────────────

fn write_block_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    match stmt {
        Stmt::Move { dir, .. } => {
            let dir = match dir {
                MoveDir::Forward => "forward",
                MoveDir::Back => "back",
            };
            let _ = writeln!(out, "move {dir}");
        }
        Stmt::Turn { dir, .. } => {
            let _ = writeln!(out, "turn {}", dir.name());
        }
        Stmt::Collect { .. } => {
            out.push_str("collect\n");
        }
        Stmt::Wait { ticks, .. } => {
            let _ = writeln!(out, "wait {ticks}");
        }
        Stmt::Log { expr, .. } => {
            let _ = writeln!(out, "log {}", expr_text(SyntaxFamily::Block, expr));
        }
        Stmt::If { .. } => {
            write_block_if(out, stmt, depth);
            indent(out, depth);
            out.push_str("end\n");
        }
        Stmt::Loop { count, body, .. } => {
            let _ = writeln!(out, "loop {}:", (*count).max(0));
            write_block(out, SyntaxFamily::Block, body, depth + 1);
            indent(out, depth);
            out.push_str("end\n");
        }
        Stmt::While { cond, body, .. } => {
            let _ = writeln!(out, "while {}:", expr_text(SyntaxFamily::Block, cond));
            write_block(out, SyntaxFamily::Block, body, depth + 1);
            indent(out, depth);
            out.push_str("end\n");
        }
    }
}

/// The `if cond: … elif …: … else: …` chain, without the final `end`
/// (the caller writes it once for the whole chain).
fn write_block_if(out: &mut String, stmt: &Stmt, depth: usize) {
    let Stmt::If {
        cond,
        consequent,
        alternate,
        ..
    } = stmt
    else {
        unreachable!("write_block_if only receives Stmt::If");
    };
    let _ = writeln!(out, "if {}:", expr_text(SyntaxFamily::Block, cond));
    write_block(out, SyntaxFamily::Block, consequent, depth + 1);
    match alternate {
        Some(ElseBranch::Elif(chained)) => {
            indent(out, depth);
            out.push_str("el");
            // The chained statement is an If; re-render it with its
            // `if` keyword fused into `elif`.
            write_block_if(out, chained, depth);
        }
        Some(ElseBranch::Else(block)) => {
            indent(out, depth);
            out.push_str("else:\n");
            write_block(out, SyntaxFamily::Block, block, depth + 1);
        }
        None => {}
    }
}

// ── Brace family ────────────────────────────────────────────────

fn write_brace_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    match stmt {
        Stmt::Move { dir, .. } => {
            let name = match dir {
                MoveDir::Forward => "move_forward",
                MoveDir::Back => "move_back",
            };
            let _ = writeln!(out, "{name}();");
        }
        Stmt::Turn { dir, .. } => {
            let _ = writeln!(out, "turn_{}();", dir.name());
        }
        Stmt::Collect { .. } => {
            out.push_str("collect();\n");
        }
        Stmt::Wait { ticks, .. } => {
            let _ = writeln!(out, "wait({ticks});");
        }
        Stmt::Log { expr, .. } => {
            let _ = writeln!(out, "log({});", expr_text(SyntaxFamily::Brace, expr));
        }
        Stmt::If { .. } => {
            write_brace_if(out, stmt, depth);
            out.push('\n');
        }
        Stmt::Loop { count, body, .. } => {
            let _ = write!(out, "for (int i = 0; i < {}; i++) ", (*count).max(0));
            write_brace_body(out, body, depth);
            out.push('\n');
        }
        Stmt::While { cond, body, .. } => {
            let _ = write!(out, "while ({}) ", expr_text(SyntaxFamily::Brace, cond));
            write_brace_body(out, body, depth);
            out.push('\n');
        }
    }
}

/// `if (…) { … }` with any `else if` / `else` arms, no trailing
/// newline (the caller adds it once).
fn write_brace_if(out: &mut String, stmt: &Stmt, depth: usize) {
    let Stmt::If {
        cond,
        consequent,
        alternate,
        ..
    } = stmt
    else {
        unreachable!("write_brace_if only receives Stmt::If");
    };
    let _ = write!(out, "if ({}) ", expr_text(SyntaxFamily::Brace, cond));
    write_brace_body(out, consequent, depth);
    match alternate {
        Some(ElseBranch::Elif(chained)) => {
            out.push_str(" else ");
            write_brace_if(out, chained, depth);
        }
        Some(ElseBranch::Else(block)) => {
            out.push_str(" else ");
            write_brace_body(out, block, depth);
        }
        None => {}
    }
}

fn write_brace_body(out: &mut String, block: &Block, depth: usize) {
    out.push_str("{\n");
    write_block(out, SyntaxFamily::Brace, block, depth + 1);
    indent(out, depth);
    out.push('}');
}

// ── Expressions ─────────────────────────────────────────────────

fn expr_text(family: SyntaxFamily, expr: &Expr) -> String {
    match expr {
        Expr::Literal { value, .. } => literal_text(value),
        Expr::Identifier { name, .. } => name.clone(),
        Expr::Binary {
            op, left, right, ..
        } => {
            format!(
                "{} {} {}",
                operand_text(family, left),
                op_text(family, *op),
                operand_text(family, right),
            )
        }
        Expr::Unary { op: UnOp::Not, operand, .. } => {
            let op = match family {
                SyntaxFamily::Block => "not ",
                SyntaxFamily::Brace => "!",
            };
            format!("{op}{}", operand_text(family, operand))
        }
        Expr::Call {
            callee, arguments, ..
        } => {
            let args: Vec<String> = arguments.iter().map(|a| expr_text(family, a)).collect();
            format!("{}({})", operand_text(family, callee), args.join(", "))
        }
        Expr::Member {
            object, property, ..
        } => {
            format!("{}.{property}", operand_text(family, object))
        }
    }
}

/// Operand position: operations get wrapped in parens so the rendered
/// source re-parses with the same shape regardless of precedence.
fn operand_text(family: SyntaxFamily, expr: &Expr) -> String {
    match expr {
        Expr::Binary { .. } | Expr::Unary { .. } => {
            format!("({})", expr_text(family, expr))
        }
        _ => expr_text(family, expr),
    }
}

fn op_text(family: SyntaxFamily, op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Eq => "==",
        BinOp::Neq => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::Lte => "<=",
        BinOp::Gte => ">=",
        BinOp::And => match family {
            SyntaxFamily::Block => "and",
            SyntaxFamily::Brace => "&&",
        },
        BinOp::Or => match family {
            SyntaxFamily::Block => "or",
            SyntaxFamily::Brace => "||",
        },
    }
}

fn literal_text(value: &Value) -> String {
    match value {
        Value::Str(s) => {
            let mut text = String::with_capacity(s.len() + 2);
            text.push('"');
            for c in s.chars() {
                match c {
                    '"' => text.push_str("\\\""),
                    '\\' => text.push_str("\\\\"),
                    '\n' => text.push_str("\\n"),
                    '\t' => text.push_str("\\t"),
                    other => text.push(other),
                }
            }
            text.push('"');
            text
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lex, parse};

    fn reparse_fixpoint(family: SyntaxFamily, source: &str) {
        let first = parse(family, lex(family, source).unwrap()).unwrap();
        let printed = unparse(family, &first.program);
        let second = parse(family, lex(family, &printed).unwrap())
            .unwrap_or_else(|e| panic!("canonical output failed to parse: {e}\n{printed}"));
        let reprinted = unparse(family, &second.program);
        assert_eq!(printed, reprinted, "unparse is not a fixpoint");
    }

    #[test]
    fn test_block_fixpoint_simple() {
        reparse_fixpoint(
            SyntaxFamily::Block,
            "move forward\nturn left\ncollect\nwait 2\nlog energy + 1",
        );
    }

    #[test]
    fn test_block_fixpoint_nested() {
        reparse_fixpoint(
            SyntaxFamily::Block,
            concat!(
                "loop 3:\n",
                "  if scan() == \"crystal\":\n",
                "    collect\n",
                "  elif energy > 20 and not x == 3:\n",
                "    move forward\n",
                "  else:\n",
                "    wait 5\n",
                "  end\n",
                "end\n",
            ),
        );
    }

    #[test]
    fn test_brace_fixpoint_nested() {
        reparse_fixpoint(
            SyntaxFamily::Brace,
            concat!(
                "for (int i = 0; i < 4; i++) {\n",
                "  if (scan() == \"wall\" || !(energy < 10)) {\n",
                "    turn_left();\n",
                "  } else if (inventory.crystal >= 1) {\n",
                "    wait(2);\n",
                "  } else {\n",
                "    move_back();\n",
                "  }\n",
                "}\n",
                "while (energy > 90) { move_forward(); }\n",
            ),
        );
    }

    #[test]
    fn test_string_escapes_round_trip() {
        reparse_fixpoint(SyntaxFamily::Block, r#"log "a\"b\\c\td""#);
    }

    #[test]
    fn test_block_rendering_shape() {
        let parsed = parse(
            SyntaxFamily::Block,
            lex(SyntaxFamily::Block, "if x == 1: collect elif x == 2: wait end").unwrap(),
        )
        .unwrap();
        let printed = unparse(SyntaxFamily::Block, &parsed.program);
        assert_eq!(
            printed,
            "if x == 1:\n  collect\nelif x == 2:\n  wait 1\nend\n"
        );
    }

    #[test]
    fn test_brace_rendering_shape() {
        let parsed = parse(
            SyntaxFamily::Brace,
            lex(SyntaxFamily::Brace, "for (int i = 0; i < 2; i++) { collect(); }").unwrap(),
        )
        .unwrap();
        let printed = unparse(SyntaxFamily::Brace, &parsed.program);
        assert_eq!(
            printed,
            "for (int i = 0; i < 2; i++) {\n  collect();\n}\n"
        );
    }
}
