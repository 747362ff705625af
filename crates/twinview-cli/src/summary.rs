use std::path::Path;

use console::Style;
use twinview_core::discovery::Discovery;
use twinview_core::export::ExportReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    ok: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_discovery_summary(original: &Path, translated: &Path, discovery: &Discovery) {
    let s = Styles::new();
    print_title(&s, "Image Pairs");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Original"),
        s.path.apply_to(original.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Translated"),
        s.path.apply_to(translated.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Pairs"),
        s.value.apply_to(discovery.pairs.len())
    );
    println!();

    for (i, pair) in discovery.pairs.iter().enumerate() {
        println!("    {:>4}. {}", s.label.apply_to(i + 1), s.ok.apply_to(&pair.filename));
    }

    if !discovery.skipped.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Skipped"));
        for skipped in &discovery.skipped {
            println!(
                "    {:<24}{}",
                s.warn.apply_to(&skipped.filename),
                s.label.apply_to(&skipped.reason)
            );
        }
    }

    if !discovery.notices.is_empty() {
        println!();
        for notice in &discovery.notices {
            println!("  {}", s.warn.apply_to(notice));
        }
    }
    println!();
}

pub fn print_export_summary(destination: &Path, report: &ExportReport) {
    let s = Styles::new();
    print_title(&s, "Export");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Destination"),
        s.path.apply_to(destination.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Exported"),
        s.value.apply_to(report.exported)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Needs fix"),
        s.warn.apply_to(report.needs_fix)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Approved"),
        s.ok.apply_to(report.approved)
    );

    if !report.failures.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Failures"));
        for failure in &report.failures {
            println!("    {}", s.warn.apply_to(failure));
        }
    }
    println!();
}
