use std::collections::VecDeque;
use veil_core::naming::IdentifierNamesGenerator;
use veil_core::random::RandomGenerator;
use veil_core::{ObfuscatorOptions, Program};
use veil_transform::custom_nodes::{CustomNode, StringArrayRotateFunctionNode};
use veil_transform::{Error, Obfuscator, StringArrayStorage};
use veil_verification::{Environment, evaluate, rotation_argument};

/// Hands out `t0`, `w0`, `t1`, `w1`, ...
struct ScriptedNames(usize);

impl IdentifierNamesGenerator for ScriptedNames {
    fn generate(&mut self) -> String {
        let name = format!("{}{}", if self.0 % 2 == 0 { "t" } else { "w" }, self.0 / 2);
        self.0 += 1;
        name
    }

    fn reserve(&mut self, _name: &str) {}
}

struct ScriptedRandom(VecDeque<i64>);

impl RandomGenerator for ScriptedRandom {
    fn random_integer(&mut self, min: i64, max: i64) -> i64 {
        let value = self.0.pop_front().unwrap_or(min);
        assert!((min..=max).contains(&value));
        value
    }
}

struct FixedHash(i32);

impl StringArrayStorage for FixedHash {
    fn hash(&self) -> i32 {
        self.0
    }
}

fn options(self_defending: bool) -> ObfuscatorOptions {
    ObfuscatorOptions {
        self_defending,
        seed: Some(11),
        ..ObfuscatorOptions::default()
    }
}

#[test]
fn test_realize_before_initialize_fails() {
    let (mut names, mut random) = (ScriptedNames(0), ScriptedRandom(VecDeque::new()));
    let options = options(false);
    let mut node = StringArrayRotateFunctionNode::new(&mut names, &mut random, &Obfuscator, &options);

    assert!(matches!(node.realize(), Err(Error::NotInitialized { .. })));
    assert!(matches!(node.render_template(), Err(Error::NotInitialized { .. })));
}

#[test]
fn test_initialize_twice_fails() {
    let (mut names, mut random) = (ScriptedNames(0), ScriptedRandom(VecDeque::new()));
    let options = options(false);
    let storage = FixedHash(0);
    let mut node = StringArrayRotateFunctionNode::new(&mut names, &mut random, &Obfuscator, &options);

    node.initialize(&storage, "arr", "hash", 5).unwrap();
    assert!(matches!(
        node.initialize(&storage, "arr", "hash", 6),
        Err(Error::AlreadyInitialized { .. })
    ));
}

#[test]
fn test_repeated_realization_succeeds() {
    let (mut names, mut random) = (ScriptedNames(0), ScriptedRandom(VecDeque::new()));
    let options = options(true);
    let storage = FixedHash(-123_456);
    let mut node = StringArrayRotateFunctionNode::new(&mut names, &mut random, &Obfuscator, &options);
    node.initialize(&storage, "arr", "hash", 250).unwrap();

    for _ in 0..4 {
        let statements = node.realize().unwrap();
        let code = Program { statements }.print(true);
        assert_eq!(code.matches("['push']").count(), 1);

        let argument = rotation_argument(&code, "arr").unwrap();
        let env = Environment::from([("hash".to_string(), -123_456)]);
        assert_eq!(evaluate(argument, &env).unwrap(), 250);
    }
}

#[test]
fn test_plain_mode_scenario() {
    let (mut names, mut random) = (ScriptedNames(0), ScriptedRandom(VecDeque::new()));
    let options = options(false);
    let storage = FixedHash(99);
    let mut node = StringArrayRotateFunctionNode::new(&mut names, &mut random, &Obfuscator, &options);
    node.initialize(&storage, "arr", "hash", 5).unwrap();

    let rendered = node.render_template().unwrap();
    assert_eq!(rotation_argument(&rendered, "arr"), Some("0x5"));
    assert!(rendered.contains("w0(++t0);"));
    assert!(!rendered.contains("hash"));
    assert!(!rendered.contains("<< 5"));
}

#[test]
fn test_hardened_mode_scenario() {
    let (mut names, mut random) = (ScriptedNames(0), ScriptedRandom(VecDeque::from([0, 0])));
    let options = options(true);
    let storage = FixedHash(0);
    let mut node = StringArrayRotateFunctionNode::new(&mut names, &mut random, &Obfuscator, &options);
    node.initialize(&storage, "arr", "hash", 1).unwrap();

    let rendered = node.render_template().unwrap();
    let argument = rotation_argument(&rendered, "arr").unwrap();
    assert_eq!(argument, "((((hash^0) << 5) - hash^0)|0)+0x1");
    assert!(argument.ends_with("+0x1"));

    let env = Environment::from([("hash".to_string(), 0)]);
    assert_eq!(evaluate(argument, &env).unwrap(), 1);
    assert!(rendered.contains("value !== 0x1"));
}

#[test]
fn test_realizations_draw_their_own_random_pair() {
    let (mut names, mut random) = (
        ScriptedNames(0),
        ScriptedRandom(VecDeque::from([10, 20, 30, 40])),
    );
    let options = options(true);
    let storage = FixedHash(5);
    let mut node = StringArrayRotateFunctionNode::new(&mut names, &mut random, &Obfuscator, &options);
    node.initialize(&storage, "arr", "hash", 100).unwrap();

    let first = node.render_template().unwrap();
    let second = node.render_template().unwrap();
    assert!(first.contains("(hash^10) << 5) - hash^20"));
    assert!(second.contains("(hash^30) << 5) - hash^40"));
    assert!(second.contains("w1(++t1);"));
    assert_ne!(first, second);
}
