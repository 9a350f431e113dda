//! Create command - scaffold a new project from a template.
//!
//! Every prompt is answered before the filesystem is touched, so cancelling
//! at any point leaves the target directory as it was.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use tracing::{debug, info};

use mvc_templates::{
    format_target_dir, inspect_target, is_valid_package_name, project_name,
    to_valid_package_name, LocatorConfig, Overwrite, PackageManagerInfo, ScaffoldReport,
    ScaffoldRequest, Scaffolder, Selections, TemplateDiscovery, TemplateError, TemplateLocator,
    TemplateRegistry, TemplateRequest, TemplateResolver, DEFAULT_TARGET_DIR,
};

use crate::error::CliError;
use crate::output;
use crate::prompt::{InquirePrompter, Prompter};
use crate::runtime;

pub const TEMPLATES_DIR_ENV: &str = "CREATE_MVC_TEMPLATES_DIR";

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory to create the project in
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Use a specific template
    #[arg(short, long, value_name = "NAME")]
    pub template: Option<String>,

    /// Directory containing template-* folders
    #[arg(long, env = TEMPLATES_DIR_ENV, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Build the template list by scanning the templates directory
    #[arg(long)]
    pub scan_templates: bool,

    /// Skip the Node.js version check
    #[arg(
        long,
        env = "CREATE_MVC_SKIP_NODE_CHECK",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub skip_node_check: bool,
}

const OVERWRITE_CHOICES: &[(&str, Overwrite)] = &[
    ("Cancel operation", Overwrite::Cancel),
    ("Remove existing files and continue", Overwrite::Wipe),
    ("Ignore files and continue", Overwrite::Ignore),
];

/// Everything a create run needs besides its arguments.
pub struct CreateContext {
    pub cwd: PathBuf,
    pub registry: TemplateRegistry,
    pub locator: TemplateLocator,
    pub package_manager: PackageManagerInfo,
}

impl CreateContext {
    pub fn from_args(args: &CreateArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let locator = locator_for(args);
        let registry = registry_for(args, &locator)?;

        Ok(Self {
            cwd,
            registry,
            locator,
            package_manager: PackageManagerInfo::detect(),
        })
    }
}

fn locator_for(args: &CreateArgs) -> TemplateLocator {
    let config = LocatorConfig::new()
        .with_templates_dir(args.templates_dir.clone())
        .from_current_exe()
        .with_workspace_dir(Some(
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join(".."),
        ));
    TemplateLocator::from_config(&config)
}

/// The builtin registry, or the scanned one with `--scan-templates`.
fn registry_for(args: &CreateArgs, locator: &TemplateLocator) -> Result<TemplateRegistry> {
    if !args.scan_templates {
        return Ok(TemplateRegistry::builtin());
    }

    let root = locator
        .templates_root()
        .ok_or_else(|| TemplateError::TemplateDirectoryNotFound {
            template: "*".to_string(),
            checked: locator.candidates().to_vec(),
        })?;
    let registry = TemplateDiscovery::new(root)
        .discover()
        .context("Failed to scan templates")?;
    Ok(registry)
}

/// Pick out the arguments that decide the template list, ahead of full
/// parsing, so `--help` lists what a run with the same flags would use.
pub fn listing_args<I, S>(raw: I) -> CreateArgs
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args = CreateArgs::default();
    let mut raw = raw.into_iter().map(Into::into);
    while let Some(arg) = raw.next() {
        let Some(arg) = arg.to_str() else {
            continue;
        };
        if arg == "--" {
            break;
        } else if arg == "--scan-templates" {
            args.scan_templates = true;
        } else if arg == "--templates-dir" {
            args.templates_dir = raw.next().map(PathBuf::from);
        } else if let Some(dir) = arg.strip_prefix("--templates-dir=") {
            args.templates_dir = Some(PathBuf::from(dir));
        }
    }
    if args.templates_dir.is_none() {
        args.templates_dir = std::env::var_os(TEMPLATES_DIR_ENV).map(PathBuf::from);
    }
    args
}

/// Registry shown in `--help`. Falls back to the builtin list when a scan fails.
pub fn listing_registry(args: &CreateArgs) -> TemplateRegistry {
    registry_for(args, &locator_for(args)).unwrap_or_else(|e| {
        debug!("Listing builtin templates: {:#}", e);
        TemplateRegistry::builtin()
    })
}

pub async fn execute(args: CreateArgs) -> Result<()> {
    if !args.skip_node_check {
        runtime::ensure_node()?;
    }

    let ctx = CreateContext::from_args(&args)?;
    let report = run(args, &ctx, &InquirePrompter).await?;

    println!();
    println!(
        "{}",
        output::success(format!(
            "Created '{}' project in {}",
            report.template_id,
            report.root.display()
        ))
    );
    println!("\nDone. Now run:\n");
    for step in next_steps(&report.root, &ctx.cwd, &ctx.package_manager) {
        println!("  {}", step);
    }
    println!();

    Ok(())
}

/// Prompt for whatever the arguments leave open, then scaffold.
pub async fn run(
    args: CreateArgs,
    ctx: &CreateContext,
    prompter: &dyn Prompter,
) -> Result<ScaffoldReport> {
    if let Some(template) = &args.template {
        if !ctx.registry.exists(template) {
            return Err(CliError::InvalidArgument {
                template: template.clone(),
                available: ctx.registry.ids(),
            }
            .into());
        }
    }

    let target_dir = match args.project_name.as_deref().and_then(format_target_dir) {
        Some(dir) => dir,
        None => {
            let answer = prompter
                .input("Project name:", DEFAULT_TARGET_DIR, None)?
                .ok_or(CliError::Cancelled)?;
            format_target_dir(&answer).unwrap_or_else(|| DEFAULT_TARGET_DIR.to_string())
        }
    };
    let root = ctx.cwd.join(&target_dir);

    let overwrite = ask_overwrite(prompter, &target_dir, &root)?;

    let project = project_name(&root);
    let package_name = if is_valid_package_name(&project) {
        None
    } else {
        let answer = prompter
            .input(
                "Package name:",
                &to_valid_package_name(&project),
                Some(validate_package_name),
            )?
            .ok_or(CliError::Cancelled)?;
        Some(answer)
    };

    let request = match args.template {
        Some(id) => TemplateRequest::Id(id),
        None => TemplateRequest::Selections(ask_selections(prompter, &ctx.registry)?),
    };
    let template_id = TemplateResolver::new(&ctx.registry)
        .resolve(&request)?
        .id
        .clone();
    info!("Using template: {}", template_id);

    let scaffold_request = ScaffoldRequest::new(template_id, root)
        .package_name(package_name)
        .overwrite(overwrite);
    let scaffolder = Scaffolder::new(ctx.locator.clone());

    let report = tokio::task::spawn_blocking(move || scaffolder.scaffold(&scaffold_request))
        .await
        .context("Scaffold task failed")??;

    Ok(report)
}

fn validate_package_name(name: &str) -> Result<(), String> {
    if is_valid_package_name(name) {
        Ok(())
    } else {
        Err("Invalid package.json name".to_string())
    }
}

/// Ask what to do with an occupied target. `None` when no question was needed.
fn ask_overwrite(
    prompter: &dyn Prompter,
    target_dir: &str,
    root: &Path,
) -> Result<Option<Overwrite>> {
    if !inspect_target(root)?.needs_disposition() {
        return Ok(None);
    }

    let subject = if target_dir == "." {
        "Current directory".to_string()
    } else {
        format!("Target directory \"{}\"", target_dir)
    };
    let items: Vec<String> = OVERWRITE_CHOICES
        .iter()
        .map(|(label, _)| label.to_string())
        .collect();

    let choice = prompter
        .select(
            &format!("{} is not empty. Please choose how to proceed:", subject),
            &items,
            0,
        )?
        .and_then(|index| OVERWRITE_CHOICES.get(index))
        .map(|(_, overwrite)| *overwrite);

    match choice {
        None | Some(Overwrite::Cancel) => Err(CliError::Cancelled.into()),
        Some(overwrite) => Ok(Some(overwrite)),
    }
}

/// One select prompt per axis, in axis order.
fn ask_selections(prompter: &dyn Prompter, registry: &TemplateRegistry) -> Result<Selections> {
    let mut selections = Selections::new();
    for axis in registry.axes() {
        let items: Vec<String> = axis
            .choices
            .iter()
            .map(|c| output::style(c.color).apply_to(&c.name).to_string())
            .collect();
        let index = prompter
            .select(&format!("Select {}:", axis.display), &items, 0)?
            .ok_or(CliError::Cancelled)?;
        let choice = axis
            .choices
            .get(index)
            .ok_or_else(|| anyhow!("Invalid choice {} for {}", index, axis.id))?;
        selections.set(axis.id.clone(), choice.name.clone());
    }
    Ok(selections)
}

/// `root` expressed relative to `cwd`, with `.` and `..` resolved lexically.
fn relative_path(root: &Path, cwd: &Path) -> PathBuf {
    let root = normalize(root);
    let cwd = normalize(cwd);
    let shared = root
        .iter()
        .zip(cwd.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..cwd.len() {
        relative.push("..");
    }
    for component in &root[shared..] {
        relative.push(component.as_os_str());
    }
    relative
}

fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components
}

/// Commands to print once the project exists.
pub fn next_steps(root: &Path, cwd: &Path, package_manager: &PackageManagerInfo) -> Vec<String> {
    let mut steps = Vec::new();
    let relative = relative_path(root, cwd);
    if !relative.as_os_str().is_empty() {
        let relative = relative.display().to_string();
        if relative.contains(' ') {
            steps.push(format!("cd \"{}\"", relative));
        } else {
            steps.push(format!("cd {}", relative));
        }
    }
    steps.push(package_manager.install_command());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::MockPrompter;
    use std::fs;
    use tempfile::tempdir;

    fn context(cwd: &Path) -> CreateContext {
        CreateContext {
            cwd: cwd.to_path_buf(),
            registry: TemplateRegistry::builtin(),
            locator: TemplateLocator::new(vec![
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
            ]),
            package_manager: PackageManagerInfo::from_user_agent("npm/10.2.0").unwrap(),
        }
    }

    fn args(project: Option<&str>, template: Option<&str>) -> CreateArgs {
        CreateArgs {
            project_name: project.map(String::from),
            template: template.map(String::from),
            ..Default::default()
        }
    }

    fn expect_axis(prompter: &mut MockPrompter, display: &'static str, index: usize) {
        let message = format!("Select {}:", display);
        prompter
            .expect_select()
            .withf(move |msg, _, _| msg == message)
            .times(1)
            .returning(move |_, _, _| Ok(Some(index)));
    }

    #[tokio::test]
    async fn test_interactive_selection_scaffolds_mysql_ts() {
        let cwd = tempdir().unwrap();
        let mut prompter = MockPrompter::new();
        prompter.expect_input().never();
        expect_axis(&mut prompter, "Server Framework", 0);
        expect_axis(&mut prompter, "Database", 2);
        expect_axis(&mut prompter, "Language", 1);

        let report = run(args(Some("shop"), None), &context(cwd.path()), &prompter)
            .await
            .unwrap();

        assert_eq!(report.template_id, "mysql-ts");
        assert!(cwd.path().join("shop/app.ts").exists());
        let pkg = fs::read_to_string(cwd.path().join("shop/package.json")).unwrap();
        assert!(pkg.contains("\"name\": \"shop\""));
    }

    #[tokio::test]
    async fn test_template_flag_skips_axis_prompts() {
        let cwd = tempdir().unwrap();
        let prompter = MockPrompter::new();

        let report = run(args(Some("my-app"), Some("pg-ts")), &context(cwd.path()), &prompter)
            .await
            .unwrap();
        assert_eq!(report.package_name, "my-app");
        assert!(cwd.path().join("my-app/.gitignore").exists());
    }

    #[tokio::test]
    async fn test_unknown_template_fails_before_prompting() {
        let cwd = tempdir().unwrap();
        let prompter = MockPrompter::new();

        let err = run(args(Some("my-app"), Some("nope")), &context(cwd.path()), &prompter)
            .await
            .unwrap_err();
        match err.downcast_ref::<CliError>() {
            Some(CliError::InvalidArgument { available, .. }) => assert_eq!(available.len(), 10),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!cwd.path().join("my-app").exists());
    }

    #[tokio::test]
    async fn test_project_name_and_package_name_prompts() {
        let cwd = tempdir().unwrap();
        let mut prompter = MockPrompter::new();
        prompter
            .expect_input()
            .withf(|msg, default, validator| {
                msg == "Project name:" && default == DEFAULT_TARGET_DIR && validator.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(Some("My App/".to_string())));
        prompter
            .expect_input()
            .withf(|msg, default, validator| {
                msg == "Package name:" && default == "my-app" && validator.is_some()
            })
            .times(1)
            .returning(|_, _, _| Ok(Some("cool-app".to_string())));

        let report = run(args(None, Some("sqlite")), &context(cwd.path()), &prompter)
            .await
            .unwrap();
        assert_eq!(report.root, cwd.path().join("My App"));
        assert_eq!(report.package_name, "cool-app");
    }

    #[tokio::test]
    async fn test_cancel_on_occupied_directory_leaves_it_untouched() {
        let cwd = tempdir().unwrap();
        let target = cwd.path().join("busy");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "mine").unwrap();

        let mut prompter = MockPrompter::new();
        prompter
            .expect_select()
            .withf(|msg, items, _| {
                msg.starts_with("Target directory \"busy\" is not empty") && items.len() == 3
            })
            .times(1)
            .returning(|_, _, _| Ok(Some(0)));

        let err = run(args(Some("busy"), Some("pg")), &context(cwd.path()), &prompter)
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Cancelled)));
        assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_wipe_on_occupied_directory() {
        let cwd = tempdir().unwrap();
        let target = cwd.path().join("busy");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("old.txt"), "old").unwrap();

        let mut prompter = MockPrompter::new();
        prompter
            .expect_select()
            .times(1)
            .returning(|_, _, _| Ok(Some(1)));

        run(args(Some("busy"), Some("pg")), &context(cwd.path()), &prompter)
            .await
            .unwrap();
        assert!(!target.join("old.txt").exists());
        assert!(target.join("app.js").exists());
    }

    #[tokio::test]
    async fn test_escape_at_axis_prompt_cancels_before_writing() {
        let cwd = tempdir().unwrap();
        let mut prompter = MockPrompter::new();
        prompter
            .expect_select()
            .times(1)
            .returning(|_, _, _| Ok(None));

        let err = run(args(Some("app"), None), &context(cwd.path()), &prompter)
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Cancelled)));
        assert!(!cwd.path().join("app").exists());
    }

    #[tokio::test]
    async fn test_unsupported_combination_reports_no_match() {
        let cwd = tempdir().unwrap();
        let mut prompter = MockPrompter::new();
        expect_axis(&mut prompter, "Server Framework", 1);
        expect_axis(&mut prompter, "Database", 1);
        expect_axis(&mut prompter, "Language", 1);

        let err = run(args(Some("app"), None), &context(cwd.path()), &prompter)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TemplateError>(),
            Some(TemplateError::NoMatchingTemplate { .. })
        ));
        assert!(!cwd.path().join("app").exists());
    }

    #[test]
    fn test_next_steps() {
        let cwd = Path::new("/work");
        let npm = PackageManagerInfo::from_user_agent("npm/10.2.0").unwrap();
        let yarn = PackageManagerInfo::from_user_agent("yarn/1.22.0").unwrap();

        assert_eq!(
            next_steps(&cwd.join("my-app"), cwd, &npm),
            vec!["cd my-app".to_string(), "npm install".to_string()]
        );
        assert_eq!(
            next_steps(&cwd.join("My App"), cwd, &yarn),
            vec!["cd \"My App\"".to_string(), "yarn".to_string()]
        );
        assert_eq!(next_steps(&cwd.join("."), cwd, &npm), vec!["npm install".to_string()]);
        assert_eq!(
            next_steps(&cwd.join("../other"), cwd, &npm),
            vec!["cd ../other".to_string(), "npm install".to_string()]
        );
        assert_eq!(
            next_steps(Path::new("/srv/apps/api"), Path::new("/work/src"), &npm),
            vec!["cd ../../srv/apps/api".to_string(), "npm install".to_string()]
        );
    }

    #[test]
    fn test_axis_items_keep_choice_names() {
        console::set_colors_enabled(false);
        let mut prompter = MockPrompter::new();
        prompter
            .expect_select()
            .withf(|msg, items, _| {
                msg == "Select Database:"
                    && items.iter().map(String::as_str).eq(["Postgres", "MongoDB", "MySQL", "SQLite"])
            })
            .times(1)
            .returning(|_, _, _| Ok(Some(3)));
        prompter
            .expect_select()
            .returning(|_, _, _| Ok(Some(0)));

        let registry = TemplateRegistry::builtin();
        let selections = ask_selections(&prompter, &registry).unwrap();
        assert_eq!(selections.get("database"), Some("SQLite"));
        assert_eq!(selections.get("server"), Some("Express"));
    }

    #[test]
    fn test_listing_args_reads_scan_flags() {
        let args = listing_args([
            "create-mvc",
            "--scan-templates",
            "--templates-dir",
            "/opt/templates",
            "--help",
        ]);
        assert!(args.scan_templates);
        assert_eq!(args.templates_dir, Some(PathBuf::from("/opt/templates")));

        let args = listing_args(["create-mvc", "--templates-dir=/srv/t", "app"]);
        assert!(!args.scan_templates);
        assert_eq!(args.templates_dir, Some(PathBuf::from("/srv/t")));
    }

    #[test]
    fn test_listing_registry_uses_scanned_templates() {
        let templates = tempdir().unwrap();
        fs::create_dir(templates.path().join("template-sqlite-ts")).unwrap();

        let args = CreateArgs {
            templates_dir: Some(templates.path().to_path_buf()),
            scan_templates: true,
            ..Default::default()
        };
        assert_eq!(listing_registry(&args).ids(), vec!["sqlite-ts".to_string()]);

        let args = CreateArgs::default();
        assert_eq!(listing_registry(&args).ids().len(), 10);
    }
}
