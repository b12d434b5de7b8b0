use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for n64rx")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Quick checks before commit (fmt, clippy)
    Check {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        #[arg(long)]
        ignored: bool,
        /// Run only CPU module tests (decoder, COP0, TLB)
        #[arg(long)]
        cpu: bool,
        /// Run only RCP device tests
        #[arg(long)]
        rcp: bool,
        /// Run only MI tests
        #[arg(long)]
        interrupt: bool,
        /// Run only Memory module tests
        #[arg(long)]
        memory: bool,
        /// Run only System module tests
        #[arg(long)]
        system: bool,
    },
    /// Run benchmarks
    Bench,
    /// Run a raw program image through the n64rx binary
    Run {
        /// Big-endian program image
        image: String,
        /// Number of cycles to execute
        #[arg(short = 'n', long, default_value = "100000")]
        cycles: u64,
        /// Run whole frames instead of a cycle count
        #[arg(short = 'f', long)]
        frames: Option<u32>,
        /// Enable fast-boot compatibility mode
        #[arg(long)]
        fast_boot: bool,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
    /// Install git hooks
    InstallHooks,
}

/// Module filters accepted by `cargo x test`
#[derive(Default, Clone, Copy)]
struct TestFilter {
    cpu: bool,
    rcp: bool,
    interrupt: bool,
    memory: bool,
    system: bool,
}

impl TestFilter {
    fn modules(self) -> Vec<(&'static str, &'static str)> {
        [
            (self.cpu, "core::cpu", "CPU"),
            (self.rcp, "core::rcp", "RCP"),
            (self.interrupt, "core::interrupt", "MI"),
            (self.memory, "core::memory", "Memory"),
            (self.system, "core::system", "System"),
        ]
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, path, name)| (path, name))
        .collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Check { verbose } => run_check(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test {
            doc,
            ignored,
            cpu,
            rcp,
            interrupt,
            memory,
            system,
        } => run_test(
            doc,
            ignored,
            TestFilter {
                cpu,
                rcp,
                interrupt,
                memory,
                system,
            },
        ),
        Commands::Bench => run_bench(),
        Commands::Run {
            image,
            cycles,
            frames,
            fast_boot,
            release,
        } => run_image(&image, cycles, frames, fast_boot, release),
        Commands::PreCommit => run_pre_commit(),
        Commands::InstallHooks => install_hooks(),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task(
        "Test",
        || run_test(false, false, TestFilter::default()),
        verbose,
    )?;

    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn run_check(verbose: bool) -> Result<()> {
    println!("{}", "=== Running Quick Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;

    println!(
        "\n{} {}",
        "✓ Checks passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy").arg("--workspace").arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(doc: bool, ignored: bool, filter: TestFilter) -> Result<()> {
    let modules = filter.modules();

    if doc || modules.is_empty() {
        let mut cmd = Command::new("cargo");
        cmd.arg("test");
        if doc {
            cmd.arg("--doc");
        }
        if ignored {
            cmd.arg("--").arg("--ignored");
        }
        return execute_command(&mut cmd);
    }

    let mut failed = Vec::new();

    for (module_path, module_name) in &modules {
        println!("{} Running {} tests...", "→".blue(), module_name.bold());

        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--lib").arg(module_path);

        if ignored {
            cmd.arg("--").arg("--ignored");
        }

        match execute_command(&mut cmd) {
            Ok(_) => println!("{} {} tests passed\n", "✓".green(), module_name),
            Err(e) => {
                println!("{} {} tests failed\n", "✗".red(), module_name);
                if modules.len() == 1 {
                    return Err(e);
                }
                failed.push(*module_name);
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Module tests failed: {}", failed.join(", "))
    }
}

fn run_bench() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");

    execute_command(&mut cmd)
}

fn run_image(
    image: &str,
    cycles: u64,
    frames: Option<u32>,
    fast_boot: bool,
    release: bool,
) -> Result<()> {
    println!("{}", "=== Program Run ===".bold().blue());

    let image_path = Path::new(image);
    if !image_path.exists() {
        println!("{} Image not found: {}", "✗".red().bold(), image.yellow());
        anyhow::bail!("Program image not found");
    }

    let size = std::fs::metadata(image_path)?.len();
    if size % 4 != 0 {
        println!(
            "{} Image size {} is not a whole number of instructions",
            "⚠".yellow(),
            size
        );
    }

    println!("{} Image: {} ({} bytes)", "✓".green(), image.cyan(), size);
    match frames {
        Some(frames) => println!("{} Frames: {}", "→".blue(), frames.to_string().bold()),
        None => println!("{} Cycles: {}", "→".blue(), cycles.to_string().bold()),
    }
    println!(
        "{} Build mode: {}",
        "→".blue(),
        if release {
            "release".green().bold()
        } else {
            "debug".yellow().bold()
        }
    );
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--bin").arg("n64rx");

    if release {
        cmd.arg("--release");
    }

    cmd.arg("--").arg(image).arg("-n").arg(cycles.to_string());
    if let Some(frames) = frames {
        cmd.arg("-f").arg(frames.to_string());
    }
    if fast_boot {
        cmd.arg("--fast-boot");
    }

    execute_command(&mut cmd)?;

    println!(
        "\n{} Run completed in {}",
        "✓".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn run_pre_commit() -> Result<()> {
    println!("{}", "=== Pre-commit Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), false)?;
    run_task("Clippy", || run_clippy(false), false)?;
    run_task(
        "Test",
        || run_test(false, false, TestFilter::default()),
        false,
    )?;

    println!(
        "\n{} {}",
        "✓ Pre-commit checks passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn install_hooks() -> Result<()> {
    println!("{}", "Installing git hooks...".bold());

    let hook_content = r#"#!/bin/sh
# Auto-generated by cargo x install-hooks
set -e

echo "Running pre-commit checks..."
cargo x pre-commit
"#;

    let hook_path = ".git/hooks/pre-commit";
    std::fs::write(hook_path, hook_content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(hook_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(hook_path, perms)?;
    }

    println!("{}", "✓ Git hooks installed".green());
    println!("  Pre-commit hook will run: fmt, clippy, test");

    Ok(())
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let timing = if verbose {
                format!("({:.2}s)", start.elapsed().as_secs_f64())
            } else {
                String::new()
            };
            println!("{} {}", "✓".green().bold(), timing);
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
