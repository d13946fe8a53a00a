//! Annotation integration tests
//!
//! Declaration-time behavior of HTTP-method and root-URI annotations across
//! both invocation protocols.


use conform::annotation::{
    delete, get, legacy_args, modern_args, post, root_uri, AnnotationArg, Annotator,
    DecoratorContext,
};
use conform::naming::HttpMethod;
use conform::registry::{Callable, ClassId, MethodMetadata, MethodOptions};
use conform::uri::{resolve_request_uri, with_path_param, with_query_param, with_root, UriOption};
use conform::{ConformError, ValidationMode};

fn user_api() -> ClassId {
    ClassId::new("UserApi")
}

// =============================================================================
// Declaration scenarios
// =============================================================================

mod declaration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_happy_path_metadata() {
        let mut annotator = Annotator::default();
        let args = legacy_args(
            &user_api(),
            "getUser",
            Callable::with_source("getUser(request: GetUserRequest, ...options) {}"),
        );

        annotator.apply_http(&get("/users/{id}"), &args).unwrap();

        assert_eq!(
            annotator.registry().methods_metadata(&user_api()),
            &[MethodMetadata {
                name: "getUser".to_string(),
                http_method: HttpMethod::Get,
                path: "/users/{id}".to_string(),
                options: MethodOptions::default(),
            }]
        );
    }

    #[test]
    fn test_literal_path_parameter_rejected() {
        let mut annotator = Annotator::default();
        let args = legacy_args(
            &user_api(),
            "getUser",
            Callable::with_source("getUser(id: string, ...options) {}"),
        );

        let err = annotator.apply_http(&get("/users/{id}"), &args).unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("[conform:signature]"));
        assert!(message.contains("\"id\""));
        assert!(message.contains("uri::with_path_param"));
        assert!(message.contains("getUser(request: GetUserRequest, ...options: RequestOption[])"));
    }

    #[test]
    fn test_every_violation_listed() {
        let mut annotator = Annotator::default();
        let args = legacy_args(
            &user_api(),
            "createUser",
            Callable::with_source("createUser(id, body, extra, ...a, ...b) {}"),
        );

        match annotator.apply_http(&post("/users/{id}"), &args) {
            Err(ConformError::SignatureViolation { violations, .. }) => {
                assert_eq!(violations.len(), 4);
            }
            other => panic!("expected signature violation, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_paths_rejected() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::method("listUsers"));

        for path in ["", "users", "/users/", "/users//all"] {
            let err = annotator.apply_http(&get(path), &args).unwrap_err();
            assert!(
                matches!(err, ConformError::MalformedPath { .. }),
                "{path:?} should be rejected"
            );
        }
        assert!(annotator.registry().methods_metadata(&user_api()).is_empty());

        assert!(annotator.apply_http(&get("/"), &args).is_ok());
    }

    #[test]
    fn test_malformed_path_suggests_fix() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::method("listUsers"));

        let message = annotator
            .apply_http(&get("users//all/"), &args)
            .unwrap_err()
            .to_string();
        assert!(message.contains("Suggested path: \"/users/all\""));
    }

    #[test]
    fn test_options_recorded() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::method("deleteUsersById"));

        let metadata = annotator
            .apply_http(&delete("/users/{id}").with_summary("Remove a user"), &args)
            .unwrap();
        assert_eq!(metadata.options.summary.as_deref(), Some("Remove a user"));
    }
}

// =============================================================================
// Protocol handling
// =============================================================================

mod protocol_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_both_protocols_record_same_metadata() {
        let source = "getUser(request: GetUserRequest, ...options) {}";

        let mut legacy = Annotator::default();
        let legacy_meta = legacy
            .apply_http(
                &get("/users/{id}"),
                &legacy_args(&user_api(), "getUser", Callable::with_source(source)),
            )
            .unwrap();

        let mut modern = Annotator::default();
        modern
            .registry_mut()
            .define_member(&user_api(), "getUser", Callable::with_source(source));
        let modern_meta = modern
            .apply_http(
                &get("/users/{id}"),
                &modern_args(&user_api(), DecoratorContext::method("getUser")),
            )
            .unwrap();

        assert_eq!(legacy_meta, modern_meta);
    }

    #[test]
    fn test_modern_without_member_is_deferred() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::method("getUser"));

        assert!(annotator.apply_http(&get("/users/{id}"), &args).is_ok());
    }

    #[test]
    fn test_modern_finds_inherited_member() {
        let mut annotator = Annotator::default();
        let base = ClassId::new("BaseApi");
        annotator
            .registry_mut()
            .declare_class(user_api(), Some(base.clone()));
        annotator
            .registry_mut()
            .define_member(&base, "getUser", Callable::with_source("getUser(id, ...options) {}"));

        let args = modern_args(&user_api(), DecoratorContext::method("getUser"));
        assert!(annotator.apply_http(&get("/users/{id}"), &args).is_err());
    }

    #[test]
    fn test_modern_field_context_records() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::field("getUsers"));

        let metadata = annotator.apply_http(&get("/users"), &args).unwrap();
        assert_eq!(metadata.name, "getUsers");
        assert_eq!(annotator.registry().methods_metadata(&user_api()), &[metadata]);
    }

    #[test]
    fn test_modern_field_context_checks_member() {
        let mut annotator = Annotator::default();
        annotator.registry_mut().define_member(
            &user_api(),
            "getUsersById",
            Callable::with_source("(id: string, ...options) => {}"),
        );

        let args = modern_args(&user_api(), DecoratorContext::field("getUsersById"));
        let err = annotator.apply_http(&get("/users/{id}"), &args).unwrap_err();
        assert!(matches!(err, ConformError::SignatureViolation { .. }));
        assert!(annotator.registry().methods_metadata(&user_api()).is_empty());
    }

    #[test]
    fn test_positional_fallback_records() {
        let mut annotator = Annotator::default();
        let args = vec![
            AnnotationArg::Target(user_api()),
            AnnotationArg::Undefined,
            AnnotationArg::Key("listUsers".to_string()),
        ];

        let metadata = annotator.apply_http(&get("/users"), &args).unwrap();
        assert_eq!(metadata.name, "listUsers");
    }
}

// =============================================================================
// Validation mode and overwrite semantics
// =============================================================================

mod lifecycle_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_disabled_mode_skips_checks() {
        let mut annotator = Annotator::new(ValidationMode::Disabled, Default::default());
        let args = legacy_args(
            &user_api(),
            "getUser",
            Callable::with_source("getUser(id, name, ...options) {}"),
        );

        let metadata = annotator.apply_http(&get("users/{id}/"), &args).unwrap();
        assert_eq!(metadata.path, "users/{id}/");
        assert_eq!(annotator.validation_mode(), ValidationMode::Disabled);
    }

    #[test]
    fn test_redecoration_overwrites_in_place() {
        let mut annotator = Annotator::default();
        for name in ["getUsers", "getUsersById"] {
            let args = modern_args(&user_api(), DecoratorContext::method(name));
            annotator.apply_http(&get("/users"), &args).unwrap();
        }
        let args = modern_args(&user_api(), DecoratorContext::method("getUsers"));
        annotator.apply_http(&get("/people"), &args).unwrap();

        let names: Vec<(&str, &str)> = annotator
            .registry()
            .methods_metadata(&user_api())
            .iter()
            .map(|m| (m.name.as_str(), m.path.as_str()))
            .collect();
        assert_eq!(names, vec![("getUsers", "/people"), ("getUsersById", "/users")]);
    }

    #[test]
    fn test_subclass_root_uri_wins() {
        let mut annotator = Annotator::default();
        let base = ClassId::new("BaseApi");
        annotator
            .registry_mut()
            .declare_class(user_api(), Some(base.clone()));

        annotator
            .apply_root_uri(&root_uri("/api"), &[AnnotationArg::Target(base.clone())])
            .unwrap();
        assert_eq!(annotator.registry().root_uri(&user_api()), Some("/api"));

        annotator
            .apply_root_uri(
                &root_uri("/api/v2"),
                &modern_args(&user_api(), DecoratorContext::class("UserApi")),
            )
            .unwrap();
        assert_eq!(annotator.registry().root_uri(&user_api()), Some("/api/v2"));
        assert_eq!(annotator.registry().root_uri(&base), Some("/api"));
    }
}

// =============================================================================
// Request URI resolution from recorded metadata
// =============================================================================

mod request_uri_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn annotated() -> Annotator {
        let mut annotator = Annotator::default();
        annotator
            .apply_root_uri(&root_uri("/api/v1/"), &[AnnotationArg::Target(user_api())])
            .unwrap();
        annotator
            .apply_http(
                &get("/users/{id}"),
                &modern_args(&user_api(), DecoratorContext::method("getUsersById")),
            )
            .unwrap();
        annotator
    }

    #[test]
    fn test_resolves_against_registered_root() {
        let annotator = annotated();
        let uri = resolve_request_uri(
            annotator.registry(),
            &user_api(),
            "getUsersById",
            [with_path_param("id", "a b"), with_query_param("expand", Some("roles"))],
        )
        .unwrap();
        assert_eq!(uri, "/api/v1/users/a%20b?expand=roles");
    }

    #[test]
    fn test_explicit_root_overrides() {
        let annotator = annotated();
        let uri = resolve_request_uri(
            annotator.registry(),
            &user_api(),
            "getUsersById",
            [with_root("https://example.test"), with_path_param("id", "7")],
        )
        .unwrap();
        assert_eq!(uri, "https://example.test/users/7");
    }

    #[test]
    fn test_unknown_method() {
        let annotator = annotated();
        let err = resolve_request_uri(
            annotator.registry(),
            &user_api(),
            "nope",
            Vec::<UriOption>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConformError::UnknownMethod { .. }));
    }

    #[test]
    fn test_missing_parameter() {
        let annotator = annotated();
        let err = resolve_request_uri(
            annotator.registry(),
            &user_api(),
            "getUsersById",
            Vec::<UriOption>::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConformError::MissingPathParameter { missing, .. } if missing == ["id"]
        ));
    }
}
