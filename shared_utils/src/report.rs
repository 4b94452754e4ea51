//! Report Module
//!
//! Summary reporting for batch operations

use crate::batch::BatchResult;
use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

/// Round to the nearest whole second, halves away from zero.
pub fn round_to_secs(duration: Duration) -> Duration {
    Duration::from_secs((duration.as_millis() as u64 + 500) / 1000)
}

pub fn print_summary_report(result: &BatchResult, duration: Duration, operation_name: &str) {
    println!();
    println!("╔══════════════════════════════════════════════════╗");
    println!("║  📊 {:<44} ║", format!("{} Summary", operation_name));
    println!("╠══════════════════════════════════════════════════╣");
    println!("║  📁 Files:              {:>10}               ║", result.total);
    println!("║  ✅ Succeeded:          {:>10}               ║", result.succeeded);
    println!("║  ❌ Failed:             {:>10}               ║", result.failed);
    println!("║  ⏭️  Skipped:            {:>10}               ║", result.skipped);
    println!(
        "║  ⏱️  Total Time:         {:>10}               ║",
        format_duration(round_to_secs(duration))
    );
    println!("╚══════════════════════════════════════════════════╝");

    if !result.errors.is_empty() {
        println!();
        println!("❌ Errors encountered:");
        for (path, error) in &result.errors {
            println!("   {} → {}", path.display(), error);
        }
    }
}
