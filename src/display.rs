use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::game::Seat;
use crate::sequence_form::SequenceForm;

/// Per-seat sizes of a sequence form plus the matrix density.
pub fn stats_table<O, A>(form: &SequenceForm<O, A>) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Seat").set_alignment(CellAlignment::Left),
        Cell::new("Infosets").set_alignment(CellAlignment::Right),
        Cell::new("Sequences").set_alignment(CellAlignment::Right),
        Cell::new("Max actions").set_alignment(CellAlignment::Right),
    ]);

    for seat in Seat::BOTH {
        let tree = form.tree(seat);
        let widest = tree.action.iter().map(Vec::len).max().unwrap_or(0);
        table.add_row(vec![
            Cell::new(seat.to_string().bold().to_string()),
            Cell::new(tree.num_infosets()).set_alignment(CellAlignment::Right),
            Cell::new(tree.num_sequences()).set_alignment(CellAlignment::Right),
            Cell::new(widest).set_alignment(CellAlignment::Right),
        ]);
    }

    let cells = form.x.num_sequences() * form.y.num_sequences();
    let density = if cells > 0 {
        form.a.nnz() as f64 / cells as f64
    } else {
        0.0
    };
    format!(
        "{}\n  {} non-zeros ({:.3}% dense)",
        table,
        form.a.nnz().to_string().bold(),
        density * 100.0
    )
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    eprintln!("{}", msg.green().bold());
}
