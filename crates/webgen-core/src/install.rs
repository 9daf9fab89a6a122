//! Package-manager invocation after composition completes
//!
//! The dependency lists are straightforward conditional appends in fixed
//! order. Installation runs after every file is written; a failed install
//! never rolls back generated files, the caller just surfaces it.

use crate::features::FeatureFlags;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

/// Timeout for each package-manager run (five minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Development-tool dependencies (npm, `--save-dev`)
pub fn dev_dependencies(flags: &FeatureFlags) -> Vec<&'static str> {
    let mut deps = vec!["express", "grunt", "grunt-contrib-watch"];
    if flags.module_loader {
        deps.push("grunt-contrib-requirejs");
    }
    if flags.styling {
        deps.push("grunt-sass");
    }
    deps
}

/// Runtime/client dependencies (bower, `--save`)
pub fn client_dependencies(flags: &FeatureFlags) -> Vec<&'static str> {
    let mut deps = vec!["jquery", "underscore"];
    if flags.module_loader {
        deps.push("requirejs");
    }
    if flags.styling {
        deps.push("foundation=zurb/bower-foundation#5.4.7");
    }
    if flags.view_library {
        deps.extend([
            "marionette",
            "backbone",
            "backbone.epoxy",
            "requirejs-plugins",
            "requirejs-text",
            "requirejs-hbs",
            "handlebars",
        ]);
    }
    deps
}

/// Install both dependency sets into the project directory
pub async fn install_all(project_dir: &Path, flags: &FeatureFlags) -> Result<()> {
    run_installer(
        project_dir,
        "npm",
        &["install", "--save-dev"],
        &dev_dependencies(flags),
    )
    .await?;
    run_installer(
        project_dir,
        "bower",
        &["install", "--save"],
        &client_dependencies(flags),
    )
    .await?;
    Ok(())
}

async fn run_installer(
    project_dir: &Path,
    program: &str,
    args: &[&str],
    packages: &[&str],
) -> Result<()> {
    run_installer_with_timeout(project_dir, program, args, packages, INSTALL_TIMEOUT).await
}

async fn run_installer_with_timeout(
    project_dir: &Path,
    program: &str,
    args: &[&str],
    packages: &[&str],
    limit: Duration,
) -> Result<()> {
    let mut command = Command::new(program);
    command
        .args(args)
        .args(packages)
        .current_dir(project_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {}", program))?;
    let mut stderr_pipe = child.stderr.take();

    let finished = timeout(limit, async {
        let mut stderr = String::new();
        if let Some(pipe) = stderr_pipe.as_mut() {
            let _ = pipe.read_to_string(&mut stderr).await;
        }
        (child.wait().await, stderr)
    })
    .await;

    let (status, stderr) = match finished {
        Ok((status, stderr)) => (
            status.with_context(|| format!("{} install did not complete", program))?,
            stderr,
        ),
        Err(_) => {
            // A hung installer must not keep mutating the project directory
            let _ = child.kill().await;
            anyhow::bail!(
                "{} install timed out after {} seconds",
                program,
                limit.as_secs()
            );
        }
    };

    if !status.success() {
        anyhow::bail!(
            "{} install failed ({}): {}",
            program,
            status,
            stderr.trim()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(module_loader: bool, styling: bool, view_library: bool) -> FeatureFlags {
        FeatureFlags {
            module_loader,
            styling,
            view_library,
        }
    }

    #[test]
    fn base_lists_are_fixed() {
        let none = flags(false, false, false);
        assert_eq!(
            dev_dependencies(&none),
            vec!["express", "grunt", "grunt-contrib-watch"]
        );
        assert_eq!(client_dependencies(&none), vec!["jquery", "underscore"]);
    }

    #[test]
    fn module_loader_appends_loader_packages() {
        let f = flags(true, false, false);
        assert!(dev_dependencies(&f).contains(&"grunt-contrib-requirejs"));
        assert!(client_dependencies(&f).contains(&"requirejs"));
    }

    #[test]
    fn view_library_appends_seven_client_packages() {
        let with = client_dependencies(&flags(false, false, true));
        let without = client_dependencies(&flags(false, false, false));
        assert_eq!(with.len(), without.len() + 7);
        assert_eq!(with.last(), Some(&"handlebars"));
    }

    #[test]
    fn styling_pins_the_foundation_release() {
        let deps = client_dependencies(&flags(false, true, false));
        assert!(deps.contains(&"foundation=zurb/bower-foundation#5.4.7"));
    }

    #[tokio::test]
    async fn timed_out_installer_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_installer_with_timeout(
            dir.path(),
            "sh",
            &["-c", "sleep 1 && touch late-write"],
            &[],
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));

        // A killed installer never gets to its deferred write
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!dir.path().join("late-write").exists());
    }

    #[tokio::test]
    async fn failing_installer_surfaces_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_installer_with_timeout(
            dir.path(),
            "sh",
            &["-c", "echo broken registry >&2; exit 1"],
            &[],
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("broken registry"));
    }
}
