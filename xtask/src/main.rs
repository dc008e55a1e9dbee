use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "portfolio_lambda";
const LAMBDA_BINARIES: [&str; 5] = [
    "recipe_api",
    "image_uploader",
    "image_analyzer",
    "analysis_result",
    "language_redirect",
];
const TESTED_PACKAGES: [&str; 3] = ["portfolio_core", "portfolio_lambda", "portfolio_web"];
const DIST_DIR: &str = "dist/lambda";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the cloud portfolio workspace",
    long_about = "A unified CLI for running the web apps, packaging the Lambda\n\
                  functions, and running CI checks in the cloud portfolio workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Roman numeral converter web app
    RomanWeb {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Run the email directory web app (needs DATABASE_URL or DB_SECRET_ARN)
    EmailWeb {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and zip each Lambda binary as a `bootstrap` artifact
    ServerlessPackage {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Package only this binary
        #[arg(long)]
        bin: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Tests only
    Test,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str], envs: &[(&str, String)]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .envs(envs.iter().map(|(key, value)| (*key, value.as_str())))
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    run_cargo_with_env(args, &[]);
}

fn run_cargo_with_env(args: &[&str], envs: &[(&str, String)]) {
    let status = cargo(args, envs);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn selected_binaries(bin: Option<&str>) -> Vec<&'static str> {
    match bin {
        None => LAMBDA_BINARIES.to_vec(),
        Some(name) => match LAMBDA_BINARIES.iter().find(|known| **known == name) {
            Some(known) => vec![*known],
            None => panic!(
                "unknown lambda binary `{name}`; expected one of: {}",
                LAMBDA_BINARIES.join(", ")
            ),
        },
    }
}

fn package_serverless_lambdas(target: &str, profile: BuildProfile, bin: Option<&str>) {
    ensure_rust_target_installed(target);
    ensure_c_linker_available(target);

    let binaries = selected_binaries(bin);

    step("Build lambda binaries");
    let mut cargo_args = vec!["build", "-p", LAMBDA_PACKAGE, "--target", target];
    for name in binaries.iter().copied() {
        cargo_args.push("--bin");
        cargo_args.push(name);
    }
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package lambda zip artifacts");
    let target_dir = Path::new("target").join(target).join(profile.dir_name());
    let dist_dir = Path::new(DIST_DIR);
    fs::create_dir_all(dist_dir).expect("failed to create lambda dist directory");

    let mut packaged = Vec::with_capacity(binaries.len());
    for name in binaries {
        let zip_path = dist_dir.join(format!("{name}.zip"));
        package_lambda_zip(&target_dir.join(binary_name(name, target)), &zip_path);
        packaged.push(zip_path);
    }

    eprintln!("\nPackaged artifacts:");
    for path in packaged {
        eprintln!("- {}", path.display());
    }
}

fn ensure_rust_target_installed(target: &str) {
    let output = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output();

    let output = match output {
        Ok(value) => value,
        Err(error) => {
            eprintln!(
                "warning: failed to run `rustup target list --installed` ({error}); continuing without target preflight"
            );
            return;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "failed to list installed rust targets; run `rustup target list --installed` manually. details: {}",
            stderr.trim()
        );
    }

    let installed = String::from_utf8_lossy(&output.stdout);
    if !installed.lines().any(|line| line.trim() == target) {
        panic!(
            "required rust target `{target}` is not installed. install it with `rustup target add {target}` and re-run `cargo run -p xtask -- serverless-package`"
        );
    }
}

fn ensure_c_linker_available(target: &str) {
    if !cfg!(windows) || !target.ends_with("unknown-linux-gnu") {
        return;
    }

    let env_override_keys = [
        format!("CC_{}", target.replace('-', "_")),
        format!("CC_{target}"),
        "TARGET_CC".to_string(),
        "CC".to_string(),
    ];

    for key in env_override_keys {
        if let Ok(value) = std::env::var(&key) {
            let candidate = value.trim();
            if !candidate.is_empty() && tool_works(candidate) {
                return;
            }
        }
    }

    let canonical = "x86_64-linux-gnu-gcc";
    if tool_works(canonical) {
        return;
    }

    panic!(
        "missing C cross-linker for target `{target}`. install `{canonical}` (or set CC_x86_64_unknown_linux_gnu) before running `cargo run -p xtask -- serverless-package`.\n\
         Tip: the AWS SDK's TLS stack builds C sources and needs a Linux C toolchain when cross-compiling from Windows."
    );
}

fn tool_works(program: &str) -> bool {
    let mut parts = program.split_whitespace();
    let Some(bin) = parts.next() else {
        return false;
    };
    let args: Vec<&str> = parts.collect();

    Command::new(bin)
        .args(&args)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn binary_name(bin_name: &str, target: &str) -> String {
    if target.contains("windows") {
        format!("{bin_name}.exe")
    } else {
        bin_name.to_string()
    }
}

fn package_lambda_zip(binary_path: &Path, zip_path: &Path) {
    if !binary_path.exists() {
        panic!("expected lambda binary at '{}'", binary_path.display());
    }

    let binary = fs::read(binary_path).expect("failed to read lambda binary");
    let file = fs::File::create(zip_path).expect("failed to create lambda zip");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .expect("failed to start bootstrap entry in lambda zip");
    zip.write_all(&binary)
        .expect("failed to write bootstrap entry");
    zip.finish().expect("failed to finish lambda zip");
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    for package in TESTED_PACKAGES {
        step(&format!("Test {package}"));
        run_cargo(&["test", "-p", package]);
    }
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::RomanWeb { port } => {
            run_cargo_with_env(
                &["run", "-p", "portfolio_web", "--bin", "roman_web"],
                &[("PORT", port.to_string())],
            );
        }
        Commands::EmailWeb { port } => {
            run_cargo_with_env(
                &["run", "-p", "portfolio_web", "--bin", "email_web"],
                &[("PORT", port.to_string())],
            );
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => {
                    ci_lint();
                    ci_test();
                }
                CiJob::Test => ci_test(),
            }
            eprintln!("\nCI job passed.");
        }
        Commands::ServerlessPackage {
            target,
            profile,
            bin,
        } => {
            package_serverless_lambdas(&target, profile, bin.as_deref());
        }
    }
}
