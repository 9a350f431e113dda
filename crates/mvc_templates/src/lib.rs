//! # mvc_templates
//!
//! Template selection and scaffolding for create-mvc.
//!
//! This crate holds everything below the prompt layer:
//!
//! - The option axes (server, database, language) and the template registry
//! - Optional template discovery from `template-*` directories
//! - Resolution of a template id or a full set of selections to one template
//! - Copying a template tree into a project directory and patching `package.json`
//!
//! ## Example
//!
//! ```rust,no_run
//! use mvc_templates::{
//!     LocatorConfig, ScaffoldRequest, Scaffolder, Selections, TemplateLocator,
//!     TemplateRegistry, TemplateRequest, TemplateResolver,
//! };
//!
//! let registry = TemplateRegistry::builtin();
//! let request = TemplateRequest::Selections(
//!     Selections::new()
//!         .with("server", "Express")
//!         .with("database", "MySQL")
//!         .with("language", "TypeScript"),
//! );
//! let template = TemplateResolver::new(&registry).resolve(&request).unwrap();
//!
//! let locator = TemplateLocator::from_config(&LocatorConfig::new().from_current_exe());
//! let report = Scaffolder::new(locator)
//!     .scaffold(&ScaffoldRequest::new(&template.id, "my-app"))
//!     .unwrap();
//! println!("{} files", report.created_files.len());
//! ```

pub mod discovery;
pub mod error;
pub mod locator;
pub mod naming;
pub mod options;
pub mod package_manager;
pub mod registry;
pub mod resolver;
pub mod scaffold;

pub use discovery::{infer_requirements, TemplateDiscovery, TEMPLATE_DIR_PREFIX};
pub use error::{TemplateError, TemplateResult};
pub use locator::{LocatorConfig, TemplateLocator};
pub use naming::{
    format_target_dir, is_valid_package_name, project_name, to_valid_package_name,
    DEFAULT_TARGET_DIR,
};
pub use options::{default_axes, Choice, ChoiceColor, OptionAxis};
pub use package_manager::PackageManagerInfo;
pub use registry::{validate_template, TemplateRegistry, TemplateSpec, ValidationResult};
pub use resolver::{Selections, TemplateRequest, TemplateResolver};
pub use scaffold::{
    empty_dir, inspect_target, patch_manifest, Overwrite, ScaffoldReport, ScaffoldRequest,
    Scaffolder, TargetState, RENAME_FILES,
};
