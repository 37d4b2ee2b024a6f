use veil_core::{IdentifierNamesGeneratorKind, ObfuscatorOptions};
use veil_transform::{ObfuscationResult, Obfuscator};
use veil_verification::{
    Environment, emitted_array, evaluate, restore_rotation, rotation_argument, runtime_hash,
};

const SOURCE: &str = "'use strict';
var greeting = 'hello';
function shout(name, times) {
    var out = greeting + ', ' + name;
    for (var i = 0; i < times; i++) {
        out += '!';
    }
    return out;
}
console.log(shout('world', 3), { 'key': 'value' }.key);";

/// String literals that end up in the array, in first-seen order.
const LITERALS: [&str; 5] = ["'hello'", "', '", "'!'", "'world'", "'value'"];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_test_writer()
        .try_init();
}

fn obfuscate(options: &ObfuscatorOptions) -> ObfuscationResult {
    init_tracing();
    Obfuscator::obfuscate(SOURCE, options).unwrap()
}

fn seeded(self_defending: bool) -> ObfuscatorOptions {
    ObfuscatorOptions {
        self_defending,
        seed: Some(2024),
        ..ObfuscatorOptions::default()
    }
}

#[test]
fn test_string_literals_move_into_the_array() {
    let result = obfuscate(&seeded(false));
    let code = result.obfuscated_code();
    let name = result.metadata.string_array_name.clone().unwrap();

    assert!(code.starts_with(&format!("var {name}=[")));
    assert!(code.contains("'use strict';"));
    assert!(code.contains("{'key':"));
    assert!(!code.contains("greeting+', '"));
    assert_eq!(result.metadata.string_array_length, LITERALS.len());
    assert_eq!(
        result.metadata.transforms_applied,
        ["StringArray", "RenameIdentifiers", "NumbersToHex"]
    );
}

#[test]
fn test_runtime_rotation_restores_the_original_order() {
    let result = obfuscate(&seeded(false));
    let name = result.metadata.string_array_name.clone().unwrap();
    let rotate_value = result.metadata.rotate_value.unwrap();
    assert!((100..=500).contains(&rotate_value));

    let emitted = emitted_array(result.obfuscated_code(), &name).unwrap();
    assert_eq!(restore_rotation(&emitted, rotate_value), LITERALS);

    let argument = rotation_argument(result.obfuscated_code(), &name).unwrap();
    assert_eq!(
        evaluate(argument, &Environment::new()).unwrap(),
        i64::from(rotate_value)
    );
}

#[test]
fn test_hardened_output_recombines_to_the_rotation_value() {
    let result = obfuscate(&seeded(true));
    let code = result.obfuscated_code();
    let metadata = &result.metadata;
    let name = metadata.string_array_name.clone().unwrap();
    let hash_name = metadata.string_array_hash_name.clone().unwrap();

    let emitted = emitted_array(code, &name).unwrap();
    let hash = runtime_hash(&emitted).unwrap();
    assert_eq!(Some(hash), metadata.string_array_hash);

    let argument = rotation_argument(code, &name).unwrap();
    assert!(argument.contains(&hash_name));
    let env = Environment::from([(hash_name.clone(), i64::from(hash))]);
    assert_eq!(
        evaluate(argument, &env).unwrap(),
        i64::from(metadata.rotate_value.unwrap())
    );

    // Tampering with the array changes the hash and the recombined value.
    let tampered = Environment::from([(hash_name, i64::from(hash ^ 1))]);
    assert_ne!(
        evaluate(argument, &tampered).unwrap(),
        i64::from(metadata.rotate_value.unwrap())
    );
}

#[test]
fn test_exactly_one_bootstrap_is_emitted() {
    for self_defending in [false, true] {
        let result = obfuscate(&seeded(self_defending));
        assert_eq!(result.obfuscated_code().matches("['push']").count(), 1);
        assert_eq!(
            result.obfuscated_code().matches("['charCodeAt']").count(),
            usize::from(self_defending)
        );
    }
}

#[test]
fn test_locals_renamed_globals_kept() {
    let result = obfuscate(&seeded(false));
    let code = result.obfuscated_code();
    assert!(code.contains("function shout("));
    assert!(code.contains("console.log(shout("));
    assert!(!code.contains("times"));
    assert!(code.contains(".key)"));
    assert!(code.contains("=0x0;"));
}

#[test]
fn test_same_seed_same_output() {
    let first = obfuscate(&seeded(true));
    let second = obfuscate(&seeded(true));
    assert_eq!(first.obfuscated_code(), second.obfuscated_code());
}

#[test]
fn test_options_from_json() {
    let options = ObfuscatorOptions::from_json(
        r#"{"selfDefending": true, "seed": 5, "identifierNamesGenerator": "mangled"}"#,
    )
    .unwrap();
    assert_eq!(options.identifier_names_generator, IdentifierNamesGeneratorKind::Mangled);

    let result = obfuscate(&options);
    assert_eq!(
        result.metadata.custom_nodes,
        [
            "StringArrayNode",
            "StringArrayHashNode",
            "StringArrayRotateFunctionNode"
        ]
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["obfuscated_code"], result.obfuscated_code());
    assert_eq!(json["metadata"]["rotate_value"], result.metadata.rotate_value.unwrap());
}

#[test]
fn test_without_custom_nodes_strings_stay() {
    let options = ObfuscatorOptions {
        custom_nodes: false,
        seed: Some(1),
        ..ObfuscatorOptions::default()
    };
    let result = obfuscate(&options);
    assert!(result.obfuscated_code().contains("'hello'"));
    assert!(result.metadata.string_array_name.is_none());
    assert!(!result.obfuscated_code().contains("['push']"));
}

#[test]
fn test_string_named_members_keep_their_names() {
    init_tracing();
    let source = "var o = { 'a'() { return 'm'; }, get 'x'() { return 'n'; } };
class K { 'b'() { return o.a(); } static 's'() {} }
console.log(new K().b(), o.x);";
    let result = Obfuscator::obfuscate(source, &seeded(false)).unwrap();
    let code = result.obfuscated_code();
    let name = result.metadata.string_array_name.clone().unwrap();

    assert!(code.contains("{'a'(){return "));
    assert!(code.contains(",get'x'(){return "));
    assert!(code.contains("class K{'b'(){return o.a();}static's'(){}}"));
    assert!(!code.contains(&format!("{name}[0x0](")));

    let emitted = emitted_array(code, &name).unwrap();
    let restored = restore_rotation(&emitted, result.metadata.rotate_value.unwrap());
    assert_eq!(restored, ["'m'", "'n'"]);
}
