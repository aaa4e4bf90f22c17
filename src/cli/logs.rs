//! Logs command for viewing the interactive console's log file

use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::{
    fs::File,
    io::{BufRead, BufReader, Seek, SeekFrom},
    path::Path,
    time::Duration,
};
use tokio::{fs, time::interval};

/// View and manage ayika logs
#[derive(Debug, Args)]
pub struct LogsCommand {
    /// Follow log output in real-time
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show from the end of the log
    #[arg(short, long, default_value = "100")]
    pub tail: usize,

    /// Filter logs by level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub level: Option<String>,

    #[command(subcommand)]
    pub command: Option<LogsSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum LogsSubcommand {
    /// Clear the log file
    Clear,
    /// Show line counts per level
    Stats,
}

const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

impl LogsCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let log_file = config.log_file();

        match self.command {
            Some(LogsSubcommand::Clear) => return clear_logs(&log_file).await,
            Some(LogsSubcommand::Stats) => return show_stats(&log_file).await,
            None => {}
        }

        if !log_file.exists() {
            eprintln!("No log file found at: {}", log_file.display());
            eprintln!("Logs are written while the interactive console runs.");
            return Ok(());
        }

        let file = File::open(&log_file)
            .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;
        let lines = self.filter_lines(read_tail_lines(file, self.tail)?);
        print_lines(&lines);

        if self.follow {
            self.follow_logs(&log_file).await
        } else {
            if lines.len() == self.tail {
                eprintln!(
                    "\nShowing last {} lines. \
                     Use --tail to show more or --follow to watch new entries.",
                    self.tail
                );
            }
            Ok(())
        }
    }

    /// Poll the file for appended lines until Ctrl+C
    async fn follow_logs(&self, log_file: &Path) -> Result<()> {
        let mut position = fs::metadata(log_file).await?.len();
        let mut interval = interval(Duration::from_millis(500));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let lines = read_new_lines(log_file, &mut position).await?;
                    print_lines(&self.filter_lines(lines));
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("\nStopping log follow...");
                    break;
                }
            }
        }
        Ok(())
    }

    fn filter_lines(&self, lines: Vec<String>) -> Vec<String> {
        match &self.level {
            Some(level) => lines
                .into_iter()
                .filter(|line| line_matches_level(line, level))
                .collect(),
            None => lines,
        }
    }
}

/// Read the last `tail` lines of a file
fn read_tail_lines(file: File, tail: usize) -> Result<Vec<String>> {
    let all_lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .context("Failed to read lines from log file")?;

    let skip = all_lines.len().saturating_sub(tail);
    Ok(all_lines.into_iter().skip(skip).collect())
}

/// Lines appended after `position`; a truncated file is read from the start
async fn read_new_lines(log_file: &Path, position: &mut u64) -> Result<Vec<String>> {
    if !log_file.exists() {
        return Ok(Vec::new());
    }

    let size = fs::metadata(log_file).await?.len();
    if size < *position {
        *position = 0;
    }
    if size == *position {
        return Ok(Vec::new());
    }

    let mut file = File::open(log_file)?;
    file.seek(SeekFrom::Start(*position))?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()?;
    *position = size;
    Ok(lines)
}

/// Level token of a `tracing_subscriber::fmt` line (`<time>  INFO <target>: <msg>`)
fn line_level(line: &str) -> Option<&'static str> {
    line.split_whitespace()
        .take(3)
        .find_map(|token| LEVELS.iter().copied().find(|level| *level == token))
}

fn line_matches_level(line: &str, level: &str) -> bool {
    line_level(line).is_some_and(|found| found.eq_ignore_ascii_case(level))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

async fn clear_logs(log_file: &Path) -> Result<()> {
    if log_file.exists() {
        fs::write(log_file, "")
            .await
            .with_context(|| format!("Failed to clear log file: {}", log_file.display()))?;
        println!("Log file cleared: {}", log_file.display());
    } else {
        println!("No log file found to clear.");
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct LogStats {
    total: usize,
    per_level: [usize; LEVELS.len()],
    other: usize,
}

impl LogStats {
    fn collect(content: &str) -> Self {
        let mut stats = Self::default();
        for line in content.lines() {
            stats.total += 1;
            match line_level(line).and_then(|level| LEVELS.iter().position(|l| *l == level)) {
                Some(index) => stats.per_level[index] += 1,
                None => stats.other += 1,
            }
        }
        stats
    }
}

async fn show_stats(log_file: &Path) -> Result<()> {
    if !log_file.exists() {
        println!("No log file found.");
        return Ok(());
    }

    let content = fs::read_to_string(log_file).await?;
    let stats = LogStats::collect(&content);
    let metadata = fs::metadata(log_file).await?;
    let modified: chrono::DateTime<chrono::Local> = metadata.modified()?.into();

    println!("Log Statistics");
    println!("==============");
    println!("File: {}", log_file.display());
    println!("Size: {} bytes ({:.2} KB)", metadata.len(), metadata.len() as f64 / 1024.0);
    println!("Last modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
    println!("Total lines: {}", stats.total);
    for (level, count) in LEVELS.iter().zip(stats.per_level) {
        println!("  {:<6} {}", level, count);
    }
    println!("  {:<6} {}", "OTHER", stats.other);
    Ok(())
}
