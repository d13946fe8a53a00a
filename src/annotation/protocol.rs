//! @acp:module "Invocation Protocols"
//! @acp:summary "Detect how a runtime invoked an annotation and normalize its arguments"
//! @acp:domain core
//! @acp:layer adapter
//!
//! Runtimes call annotation functions in one of two incompatible shapes:
//!
//! - **Legacy (positional)**: `(target, propertyKey, propertyDescriptor)`
//! - **Modern (descriptor-object)**: `(target, context)` where `context.kind`
//!   is `method`, `field` or `class`
//!
//! [`normalize`] turns either shape into one [`Invocation`] so that nothing
//! downstream ever inspects raw argument lists again.

use serde::{Deserialize, Serialize};

use crate::error::{ConformError, Result};
use crate::registry::{Callable, ClassId};

/// @acp:summary "Member kind reported by a modern decorator context"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Method,
    Field,
    Class,
}

/// @acp:summary "Context object of the modern protocol"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorContext {
    pub kind: ContextKind,
    pub name: String,
}

impl DecoratorContext {
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Method,
            name: name.into(),
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Field,
            name: name.into(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Class,
            name: name.into(),
        }
    }
}

/// @acp:summary "Property descriptor of the legacy protocol"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub value: Option<Callable>,
}

impl PropertyDescriptor {
    pub fn of(callable: Callable) -> Self {
        Self {
            value: Some(callable),
        }
    }
}

/// @acp:summary "One raw argument as handed over by the runtime"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationArg {
    Target(ClassId),
    Key(String),
    Descriptor(PropertyDescriptor),
    Context(DecoratorContext),
    Undefined,
}

/// @acp:summary "Which protocol an invocation used"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationKind {
    Legacy,
    Modern,
}

/// @acp:summary "Normalized annotation invocation"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: InvocationKind,
    pub target: ClassId,
    /// `None` for class-level applications
    pub method_name: Option<String>,
    /// Only the legacy protocol hands over the function directly
    pub descriptor: Option<Callable>,
    pub context_kind: Option<ContextKind>,
}

/// Build the legacy argument list `(target, key, descriptor)`
pub fn legacy_args(target: &ClassId, key: &str, callable: Callable) -> Vec<AnnotationArg> {
    vec![
        AnnotationArg::Target(target.clone()),
        AnnotationArg::Key(key.to_string()),
        AnnotationArg::Descriptor(PropertyDescriptor::of(callable)),
    ]
}

/// Build the modern argument list `(target, context)`
pub fn modern_args(target: &ClassId, context: DecoratorContext) -> Vec<AnnotationArg> {
    vec![
        AnnotationArg::Target(target.clone()),
        AnnotationArg::Context(context),
    ]
}

/// @acp:summary "Detect the protocol in use and normalize the arguments"
///
/// A string second argument means legacy, a context object means modern.
/// Anything else is read positionally as a legacy argument list.
pub fn normalize(args: &[AnnotationArg]) -> Result<Invocation> {
    let target = match args.first() {
        Some(AnnotationArg::Target(target)) => Some(target.clone()),
        _ => None,
    };

    match (target, args.get(1)) {
        (Some(target), Some(AnnotationArg::Key(key))) => {
            let descriptor = match args.get(2) {
                Some(AnnotationArg::Descriptor(descriptor)) => descriptor.value.clone(),
                _ => None,
            };
            tracing::debug!("Legacy annotation on {}.{}", target, key);
            Ok(Invocation {
                kind: InvocationKind::Legacy,
                target,
                method_name: Some(key.clone()),
                descriptor,
                context_kind: None,
            })
        }
        (Some(target), Some(AnnotationArg::Context(context))) => {
            tracing::debug!(
                "Modern annotation on {} ({:?} {})",
                target,
                context.kind,
                context.name
            );
            let method_name = (context.kind != ContextKind::Class).then(|| context.name.clone());
            Ok(Invocation {
                kind: InvocationKind::Modern,
                target,
                method_name,
                descriptor: None,
                context_kind: Some(context.kind),
            })
        }
        _ => normalize_positional(args),
    }
}

fn normalize_positional(args: &[AnnotationArg]) -> Result<Invocation> {
    let mut target = None;
    let mut method_name = None;
    let mut descriptor = None;

    for arg in args {
        match arg {
            AnnotationArg::Target(id) if target.is_none() => target = Some(id.clone()),
            AnnotationArg::Key(key) if method_name.is_none() => method_name = Some(key.clone()),
            AnnotationArg::Descriptor(d) if descriptor.is_none() => descriptor = d.value.clone(),
            _ => {}
        }
    }

    let target = target.ok_or_else(|| {
        ConformError::UnsupportedTarget(format!(
            "no class target among {} annotation argument(s)",
            args.len()
        ))
    })?;
    tracing::debug!("Positional fallback for annotation on {}", target);

    Ok(Invocation {
        kind: InvocationKind::Legacy,
        target,
        method_name,
        descriptor,
        context_kind: None,
    })
}
