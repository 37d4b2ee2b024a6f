use veil_core::{IdentifierNamesGeneratorKind, ObfuscatorOptions};
use veil_transform::self_hosting::SelfHostingInvoker;
use veil_transform::{Error, Obfuscator};

const BOOTSTRAP: &str = "(function (array, times) {
    var advance = function (count) {
        while (--count) {
            array['push'](array['shift']());
        }
    };
    advance(++times);
})(arr, 0x64);";

#[test]
fn test_inner_run_adds_no_nodes() {
    let options = ObfuscatorOptions {
        self_defending: true,
        seed: Some(3),
        ..ObfuscatorOptions::default()
    };
    let out = SelfHostingInvoker::new(&Obfuscator)
        .obfuscate(BOOTSTRAP, &options)
        .unwrap();

    assert_eq!(out.matches("['push']").count(), 1);
    assert!(!out.contains("charCodeAt"));
    assert!(out.contains("(arr,0x64);"));
    assert!(!out.contains("advance"));
}

#[test]
fn test_naming_style_follows_the_caller() {
    let options = ObfuscatorOptions {
        identifier_names_generator: IdentifierNamesGeneratorKind::Mangled,
        seed: Some(3),
        ..ObfuscatorOptions::default()
    };
    let out = SelfHostingInvoker::new(&Obfuscator)
        .obfuscate(BOOTSTRAP, &options)
        .unwrap();
    assert!(out.starts_with("(function(a,b){var c=function(d){"));
}

#[test]
fn test_constraints_keep_only_naming_and_seed() {
    let options = ObfuscatorOptions {
        identifier_names_generator: IdentifierNamesGeneratorKind::Mangled,
        seed: Some(9),
        self_defending: true,
        numbers_to_hex: false,
        ..ObfuscatorOptions::default()
    };
    let constraints = SelfHostingInvoker::constraints(&options);
    assert_eq!(
        constraints,
        ObfuscatorOptions {
            identifier_names_generator: IdentifierNamesGeneratorKind::Mangled,
            seed: Some(9),
            ..ObfuscatorOptions::no_additional_nodes()
        }
    );
}

#[test]
fn test_invalid_fragment_is_fatal() {
    let err = SelfHostingInvoker::new(&Obfuscator)
        .obfuscate("(function () {", &ObfuscatorOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::SelfHosting(inner) if matches!(*inner, Error::Core(_))));
}
