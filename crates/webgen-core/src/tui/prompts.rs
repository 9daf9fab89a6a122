//! Interactive collection of the project name and feature toggles
//!
//! The prompts run exactly once; the resulting `FeatureFlags` value is
//! immutable for the rest of the pipeline.

use crate::features::{Feature, FeatureFlags};
use crate::install;
use crate::pipeline::{self, GenerateOptions};
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Project display name
    pub name: Option<String>,

    /// Pre-answered feature toggles (prompted when absent)
    pub module_loader: Option<bool>,
    pub styling: Option<bool>,
    pub view_library: Option<bool>,

    /// Skip npm/bower installation after generation
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs) -> Result<()> {
    cliclack::intro("tryout")?;

    // Step 1: Select directory
    let project_dir = select_directory(&args)?;

    // Step 2: Collect the project name and feature toggles (once)
    let project_name = select_name(&args, &project_dir)?;
    let flags = select_features(&args)?;

    let enabled: Vec<&str> = flags
        .enabled_features()
        .iter()
        .map(|f| f.display_name())
        .collect();
    if enabled.is_empty() {
        cliclack::log::info("Features: none")?;
    } else {
        cliclack::log::info(format!("Features: {}", enabled.join(", ")))?;
    }

    // Step 3: Generate the project skeleton
    let spinner = cliclack::spinner();
    spinner.start("Generating project...");
    let opts = GenerateOptions {
        project_name,
        flags,
    };
    let report = match pipeline::generate(&project_dir, &opts) {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Generation failed");
            return Err(e.into());
        }
    };
    spinner.stop(format!(
        "Created {} files in {} ({} document edit{})",
        report.files.len(),
        project_dir.display(),
        report.document_passes,
        if report.document_passes == 1 { "" } else { "s" }
    ));

    // Step 4: Install dependencies (failure never rolls back the files)
    if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
    } else {
        let spinner = cliclack::spinner();
        spinner.start("Installing dependencies (npm, bower)...");
        match install::install_all(&project_dir, &flags).await {
            Ok(()) => spinner.stop("Dependencies installed"),
            Err(e) => {
                spinner.stop("Dependency installation failed");
                cliclack::log::warning(format!(
                    "{}. The project was generated; run the installs manually.",
                    e
                ))?;
            }
        }
    }

    // Step 5: Show next steps
    print_next_steps(&project_dir)?;

    Ok(())
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Use --directory flag if provided
    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(".")
            .default_input(".")
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    // Warn if directory exists and has files
    if path.exists() && path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

fn select_name(args: &CreateArgs, project_dir: &std::path::Path) -> Result<String> {
    if let Some(name) = &args.name {
        return Ok(name.clone());
    }

    let fallback = project_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "tryout".to_string());

    if args.yes {
        return Ok(fallback);
    }

    let name: String = cliclack::input("What is your tryout's name?")
        .placeholder(fallback.as_str())
        .default_input(fallback.as_str())
        .interact()?;
    Ok(name)
}

fn select_features(args: &CreateArgs) -> Result<FeatureFlags> {
    Ok(FeatureFlags {
        module_loader: select_toggle(args, Feature::ModuleLoader, args.module_loader)?,
        styling: select_toggle(args, Feature::Styling, args.styling)?,
        view_library: select_toggle(args, Feature::ViewLibrary, args.view_library)?,
    })
}

fn select_toggle(args: &CreateArgs, feature: Feature, preset: Option<bool>) -> Result<bool> {
    if let Some(value) = preset {
        return Ok(value);
    }
    if args.yes {
        // Matches the interactive default
        return Ok(true);
    }
    let value = cliclack::confirm(format!("Do you want to use {}?", feature.display_name()))
        .initial_value(true)
        .interact()?;
    Ok(value)
}

fn print_next_steps(project_dir: &std::path::Path) -> Result<()> {
    let mut steps = Vec::new();
    let current = std::env::current_dir().ok();
    if current.as_deref() != Some(project_dir) {
        steps.push(format!("cd {}", project_dir.display()));
    }
    steps.push("npm start  (dev server on http://localhost:3000)".to_string());
    steps.push("grunt  (run the build tasks)".to_string());

    println!();
    println!("  {}", "Next steps".cyan().bold());
    println!();
    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
