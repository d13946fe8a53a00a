#![forbid(unsafe_code)]

//! @acp:module "Conform Library"
//! @acp:summary "Declaration-time compliance for generated API client classes"
//! @acp:domain core
//! @acp:layer api
//! @acp:stability stable
//!
//! # Conform
//!
//! Client classes declare HTTP operations through method and class
//! annotations. This library enforces, at the moment an annotation is
//! applied and again at audit time, that every declaration follows one
//! naming and calling convention.
//!
//! ## Features
//!
//! - **Fail-fast annotations**: malformed paths and non-conforming
//!   signatures never register ([`annotation`])
//! - **Two invocation protocols**: legacy positional and modern
//!   descriptor-object calls normalize to one record
//! - **Deterministic naming**: `GET /api/users/{id}` is `getUsersById`
//!   ([`naming`])
//! - **Audits with hints**: structured reports, fuzzy suggestions for
//!   misnamed types ([`compliance`], [`fuzzy`])
//! - **URI resolution**: root, placeholders and query in one pipeline ([`uri`])
//!
//! ## Example
//!
//! ```rust
//! use conform::annotation::{get, modern_args, root_uri, AnnotationArg, Annotator, DecoratorContext};
//! use conform::compliance::{check_compliance, CheckOptions};
//! use conform::registry::ClassId;
//!
//! let mut annotator = Annotator::default();
//! let class = ClassId::new("UserApi");
//!
//! annotator.apply_root_uri(&root_uri("/api/v1"), &[AnnotationArg::Target(class.clone())])?;
//! annotator.apply_http(
//!     &get("/users/{id}"),
//!     &modern_args(&class, DecoratorContext::method("getUsersById")),
//! )?;
//!
//! let report = check_compliance(annotator.registry(), &class, &CheckOptions::default());
//! assert!(report.is_valid);
//! # Ok::<(), conform::ConformError>(())
//! ```

pub mod annotation;
pub mod commands;
pub mod compliance;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod manifest;
pub mod naming;
pub mod path;
pub mod registry;
pub mod report;
pub mod signature;
pub mod uri;

// Re-exports
pub use annotation::{Annotator, HttpAnnotation, RootUriAnnotation};
pub use compliance::{check_compliance, check_registry, CheckOptions, ModuleContext};
pub use config::{Config, ValidationMode};
pub use error::{ConformError, Result};
pub use fuzzy::{find_related, FuzzyMatch, MatchSignal};
pub use naming::{
    derive_method_name, derive_operation_names, DerivedNames, HttpMethod, NamingRules,
    OperationDescriptor, ParameterDescriptor, ParameterLocation, PathParamOrder,
};
pub use path::{is_valid_path, validate_path, PathCheck, PathRule};
pub use registry::{Callable, ClassId, ClientRegistry, MethodMetadata, MethodOptions};
pub use report::ValidationResult;
pub use signature::{inspect, ClassifiedParameters, ParsedParameter, SignatureInspection};
pub use uri::{resolve_uri, UriOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
