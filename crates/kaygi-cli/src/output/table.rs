use kaygi_core::guidance::Tone;
use kaygi_core::session::HistoryView;
use kaygi_core::Prediction;

fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "🟢",
        Tone::Warning => "🟡",
        Tone::Error => "🔴",
    }
}

pub fn print_prediction(prediction: &Prediction) {
    let guidance = &prediction.guidance;
    println!("{} {}\n", tone_marker(guidance.tone), guidance.headline);
    println!("{}\n", guidance.explanation);

    for section in &guidance.sections {
        println!("=== {} ===", section.title);
        for item in &section.items {
            println!("  - {item}");
        }
        println!();
    }

    println!(
        "Tahmin geçmişe eklendi: {} ({})",
        prediction.record.outcome, prediction.record.prediction
    );
}

pub fn print_history(view: &HistoryView) {
    print!("{}", format_history(view));
}

/// An emptied store still shows its columns; only a missing one gets the notice.
fn format_history(view: &HistoryView) -> String {
    if view.records.is_empty() && !view.stored {
        return "Henüz geçmiş verisi yok.\n".to_string();
    }

    let rows: Vec<[String; 6]> = view.records.iter().map(|r| r.values()).collect();
    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = format!("  #  {}\n", pad(&view.columns, &widths));
    for (n, row) in rows.iter().enumerate() {
        out.push_str(&format!("{:>3}  {}\n", n, pad(row, &widths)));
    }
    out.push_str(&format!("\n{} kayıt\n", rows.len()));
    out
}

fn pad(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
