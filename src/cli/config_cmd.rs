use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::output::OutputOptions;
use crate::core::config::AppConfig;

pub fn init(path: &Path, _opts: &OutputOptions) -> Result<()> {
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    AppConfig::default().save_to(path)?;
    println!("Generated config at {}", path.display());
    Ok(())
}

pub fn check(path: &Path, opts: &OutputOptions) -> Result<()> {
    if !path.exists() {
        println!("No config file at {} (defaults in use)", path.display());
    }

    let config = match AppConfig::load_from(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let mut issues = config.validate();
    if let Err(e) = config.token() {
        issues.push(e.to_string());
    }

    if issues.is_empty() {
        let ok = "Config is valid";
        if opts.use_color {
            colored::control::set_override(true);
            println!("{}", ok.green());
        } else {
            println!("{}", ok);
        }
        return Ok(());
    }

    for issue in &issues {
        if opts.use_color {
            colored::control::set_override(true);
            eprintln!("  {} {}", "✗".red(), issue);
        } else {
            eprintln!("  x {}", issue);
        }
    }
    std::process::exit(1);
}

pub fn path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}
