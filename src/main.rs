use clap::{Parser, Subcommand};
use mjml_studio::compiler::MjmlCli;
use mjml_studio::config::{self, StudioConfig};
use mjml_studio::pipeline::{self, Target};
use mjml_studio::registry::{self, Workspace};
use mjml_studio::ses::{self, SesRequest};
use mjml_studio::{logger, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "mjml-studio")]
#[command(about = "Multi-project MJML email build pipeline")]
#[command(long_about = "\
Multi-project MJML email build pipeline

Every directory under projects/ is a project with its own templates and
metadata. Templates compile to HTML under dist/<project>/, mirroring the
template tree.

Workspace structure:

  ./
  ├── studio.toml                      # Optional config (see gen-config)
  ├── projects/
  │   └── todoconta/
  │       ├── config/project.json      # Display name, AWS settings (optional)
  │       ├── components/              # <mj-include> fragments, never compiled
  │       ├── templates/
  │       │   ├── welcome.mjml         # → dist/todoconta/welcome.html
  │       │   └── workshop/
  │       │       └── reminder.mjml    # → dist/todoconta/workshop/reminder.html
  │       └── docs/                    # SES template documents (ses-template)
  └── dist/

Builds always minify, skip beautification, and validate in soft mode:
structural warnings are reported but do not fail the build. The exit status
is 1 if any template or project failed.

Run 'mjml-studio gen-config' to generate a documented studio.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Workspace root (contains projects/ and studio.toml)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile templates to HTML
    Build {
        /// Build only this project
        #[arg(long)]
        project: Option<String>,
    },
    /// List the templates a build would compile, without compiling
    Check {
        /// Check only this project
        #[arg(long)]
        project: Option<String>,
    },
    /// List projects with their display names
    Projects,
    /// Wrap a compiled template into an AWS SES template document
    SesTemplate {
        #[arg(long)]
        project: String,
        /// Template path relative to dist/<project>/, without extension
        #[arg(long)]
        template: String,
        /// SES template name (default: aws.templatePrefix + template)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Print a stock studio.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet, cli.no_color);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    let root = match std::path::absolute(&cli.root) {
        Ok(root) => root,
        Err(e) => {
            error!("Cannot resolve root {}: {e}", cli.root.display());
            return ExitCode::FAILURE;
        }
    };
    let config = match config::load_config(&root) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let workspace = Workspace::new(&root, &config);
    debug!(root = %root.display(), projects = %workspace.projects_dir().display(), "workspace resolved");

    match cli.command {
        Command::Build { project } => run_build(&workspace, &config, Target::from_option(project)),
        Command::Check { project } => run_check(&workspace, Target::from_option(project)),
        Command::Projects => run_projects(&workspace),
        Command::SesTemplate {
            project,
            template,
            name,
            subject,
            text,
        } => run_ses_template(
            &workspace,
            &SesRequest {
                project,
                template,
                name,
                subject,
                text,
            },
        ),
        Command::GenConfig => ExitCode::SUCCESS,
    }
}

fn run_build(workspace: &Workspace, config: &StudioConfig, target: Target) -> ExitCode {
    let transform = MjmlCli::from_config(&config.compiler);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_build_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = pipeline::build(workspace, config, &target, &transform, Some(tx));
    printer.join().ok();

    match result {
        Ok(report) => {
            output::print_build_summary(&report);
            exit_code(report.succeeded())
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_check(workspace: &Workspace, target: Target) -> ExitCode {
    match pipeline::check(workspace, &target) {
        Ok(inventory) => {
            output::print_check_output(&inventory);
            exit_code(inventory.iter().all(|p| p.templates.is_ok()))
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_projects(workspace: &Workspace) -> ExitCode {
    let ids = match registry::list_projects(workspace.projects_dir()) {
        Ok(ids) => ids,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut projects = Vec::new();
    let mut ok = true;
    for id in ids {
        match registry::load_project_meta(workspace, &id) {
            Ok(project) => projects.push(project),
            Err(e) => {
                error!(project = %id, "{e}");
                ok = false;
            }
        }
    }
    output::print_project_list(&projects);
    exit_code(ok)
}

fn run_ses_template(workspace: &Workspace, request: &SesRequest) -> ExitCode {
    match ses::prepare_ses_template(workspace, request) {
        Ok(file) => {
            output::print_ses_output(&file, workspace.root());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
