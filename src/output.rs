use crate::listing::DirectoryEntry;
use crate::scanner::DetectionResult;
use crate::utils::display_path;
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::Path;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Standard output
    Verbose,     // More details
    VeryVerbose, // All details including file paths
}

#[derive(Serialize)]
struct JsonListing<'a> {
    version: &'static str,
    timestamp: String,
    folder: String,
    entries: &'a [DirectoryEntry],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    signed: usize,
    unsigned: usize,
}

#[derive(Serialize)]
struct JsonDetection<'a> {
    path: String,
    is_signed: bool,
    signer: &'a str,
}

fn summarize(entries: &[DirectoryEntry]) -> JsonSummary {
    let signed = entries.iter().filter(|e| e.is_signed).count();
    JsonSummary {
        total: entries.len(),
        signed,
        unsigned: entries.len() - signed,
    }
}

/// Fit `text` into `width` columns, eliding the middle
fn fit(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width || width < 5 {
        return text.to_string();
    }
    let keep = width - 3;
    let head: String = chars[..keep / 2].iter().collect();
    let tail: String = chars[chars.len() - (keep - keep / 2)..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn print_human(folder: &Path, entries: &[DirectoryEntry], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    println!();
    println!("{} {}", "Documents in".bold(), display_path(folder).bold());
    println!("{}", "=".repeat(78).dimmed());

    if entries.is_empty() {
        println!("{}", "No documents found.".dimmed());
        println!();
        return;
    }

    println!(
        "{:<36} {:<19} {:<6} {}",
        "Name".bold(),
        "Modified".bold(),
        "Signed".bold(),
        "Signer".bold()
    );
    println!("{}", "-".repeat(78).dimmed());

    for entry in entries {
        let signed = if entry.is_signed {
            format!("{:<6}", entry.signed_label()).green()
        } else {
            format!("{:<6}", entry.signed_label()).red()
        };
        println!(
            "{:<36} {:<19} {} {}",
            fit(&entry.file_name, 36),
            entry.modified_time.format("%Y-%m-%d %H:%M:%S"),
            signed,
            entry.signer
        );
        if mode == OutputMode::VeryVerbose {
            println!("  {}", display_path(&entry.full_path).dimmed());
        }
    }

    let summary = summarize(entries);
    println!("{}", "-".repeat(78).dimmed());
    println!(
        "{} documents, {} signed, {} unsigned",
        summary.total,
        summary.signed.to_string().green(),
        summary.unsigned.to_string().red()
    );
    println!();
}

pub fn print_json(folder: &Path, entries: &[DirectoryEntry]) -> Result<()> {
    let listing = JsonListing {
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        folder: display_path(folder),
        entries,
        summary: summarize(entries),
    };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

pub fn print_detection(path: &Path, result: &DetectionResult, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    let label = if result.is_signed {
        "Signed".green().bold()
    } else {
        "Not signed".red().bold()
    };
    println!("{}  {}", label, display_path(path));
    if result.is_signed || mode != OutputMode::Normal {
        println!("  {} {}", "Signer:".dimmed(), result.signer);
    }
}

pub fn print_detection_json(path: &Path, result: &DetectionResult) -> Result<()> {
    let detection = JsonDetection {
        path: display_path(path),
        is_signed: result.is_signed,
        signer: &result.signer,
    };
    println!("{}", serde_json::to_string_pretty(&detection)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::path::PathBuf;

    fn entry(name: &str, is_signed: bool) -> DirectoryEntry {
        DirectoryEntry {
            file_name: name.to_string(),
            modified_time: Local::now(),
            is_signed,
            signer: if is_signed { "Alice".into() } else { "N/A".into() },
            full_path: PathBuf::from(name),
        }
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("short.pdf", 36), "short.pdf");
        let long = "a".repeat(20) + &"b".repeat(20);
        let fitted = fit(&long, 11);
        assert_eq!(fitted.chars().count(), 11);
        assert!(fitted.starts_with("aaaa"));
        assert!(fitted.ends_with("bbbb"));
    }

    #[test]
    fn test_summary_counts() {
        let entries = vec![entry("a.pdf", true), entry("b.pdf", false), entry("c.pdf", true)];
        let summary = summarize(&entries);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.signed, 2);
        assert_eq!(summary.unsigned, 1);
    }

    #[test]
    fn test_entry_json_shape() {
        let value = serde_json::to_value(entry("a.pdf", true)).unwrap();
        assert_eq!(value["file_name"], "a.pdf");
        assert_eq!(value["is_signed"], true);
        assert_eq!(value["signer"], "Alice");
        assert!(value["modified_time"].is_string());
    }
}
