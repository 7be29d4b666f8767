// ==========================================
// Merchify 降价建议 - 命令行入口
// ==========================================
// 用法: merchify <ist-datei>[,<ist-datei>...] <plan-datei> [ausgabe.csv]
// ==========================================

use merchify::api::describe_batch;
use merchify::app::AppState;
use merchify::i18n::t_with_args;
use merchify::MarkdownReport;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn print_usage() {
    eprintln!("Merchify {} - {}", merchify::VERSION, merchify::APP_NAME);
    eprintln!();
    eprintln!("Verwendung: merchify <ist-datei>[,<ist-datei>...] <plan-datei> [ausgabe.csv]");
    eprintln!();
    eprintln!("Umgebungsvariablen:");
    eprintln!("  MERCHIFY_DB_PATH     Pfad der Konfigurationsdatenbank");
    eprintln!("  MERCHIFY_LOG_FORMAT  json für strukturierte Logausgabe");
    eprintln!("  RUST_LOG             Logfilter (Standard: info)");
}

fn print_report(report: &MarkdownReport) {
    for batch in &report.import_batches {
        println!("{}", describe_batch(batch));
    }
    println!();

    let summary = &report.summary;
    println!(
        "{}",
        t_with_args(
            "recommendation.summary",
            &[
                ("total", summary.total_rows.to_string().as_str()),
                ("matched", summary.matched_rows.to_string().as_str()),
                ("markdown", summary.markdown_rows.to_string().as_str()),
            ],
        )
    );
    if let Some(avg) = summary.avg_markdown_pct {
        println!("Ø Abschrift: {:.2} %", avg);
    }

    println!();
    println!("{:<20} {:>6} {:>6} {:>6} {:>6} {:>6}", "Warengruppe", "HOCH", "MITTEL", "NIEDR.", "KEINE", "OFFEN");
    for dist in &report.tier_distribution {
        println!(
            "{:<20} {:>6} {:>6} {:>6} {:>6} {:>6}",
            dist.category, dist.high, dist.medium, dist.low, dist.none, dist.undetermined
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    merchify::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        print_usage();
        return ExitCode::from(2);
    }

    let actual_paths: Vec<PathBuf> = args[0]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();
    let plan_path = Path::new(&args[1]);
    let output_path = args.get(2).map(Path::new);

    let state = match AppState::with_default_path() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "配置库初始化失败");
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(db_path = %state.db_path, version = merchify::VERSION, "Merchify 启动");

    let api = &state.markdown_api;
    if let Err(e) = api.apply_locale().await {
        tracing::warn!(error = %e, "语言配置读取失败，使用默认语言");
    }

    let report = match api.run(&actual_paths, plan_path).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "分析失败");
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    print_report(&report);

    if let Some(output_path) = output_path {
        if let Err(e) = api.export_csv(&report.recommendations, output_path) {
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
        println!(
            "{}",
            t_with_args(
                "export.written",
                &[("path", output_path.display().to_string().as_str())]
            )
        );
    }

    ExitCode::SUCCESS
}
