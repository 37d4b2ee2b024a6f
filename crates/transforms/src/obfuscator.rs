use crate::custom_nodes::{
    CustomNode, StringArrayHashNode, StringArrayNode, StringArrayRotateFunctionNode,
};
use crate::numbers::NumbersToHex;
use crate::pass::{DefaultPass, Pass};
use crate::rename::RenameIdentifiers;
use crate::string_array::StringArrayTransform;
use crate::string_array::storage::{StringArray, StringArrayStorage};
use crate::{Engine, Result, Transform, TransformContext};
use serde::{Deserialize, Serialize};
use veil_core::{ObfuscatorOptions, Program};

/// Bounds of the random string array rotation.
const ROTATE_MIN: i64 = 100;
const ROTATE_MAX: i64 = 500;

/// Result of the obfuscation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObfuscationResult {
    /// The obfuscated source
    pub obfuscated_code: String,
    /// Metadata about the obfuscation process
    pub metadata: ObfuscationMetadata,
}

impl ObfuscationResult {
    pub fn new(obfuscated_code: String, metadata: ObfuscationMetadata) -> Self {
        Self {
            obfuscated_code,
            metadata,
        }
    }

    pub fn obfuscated_code(&self) -> &str {
        &self.obfuscated_code
    }
}

/// Metadata about the obfuscation process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObfuscationMetadata {
    /// Names of transforms that changed the program
    pub transforms_applied: Vec<String>,
    /// Names of the custom nodes spliced into the program, in order
    pub custom_nodes: Vec<String>,
    pub string_array_length: usize,
    pub string_array_name: Option<String>,
    pub string_array_hash_name: Option<String>,
    /// Hash of the emitted string array, when self-defense needs it
    pub string_array_hash: Option<i32>,
    pub rotate_value: Option<u32>,
    pub original_tokens: usize,
    pub obfuscated_tokens: usize,
}

/// The obfuscation engine.
///
/// Holds no state between runs, so custom nodes can re-enter it while a run
/// is in progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct Obfuscator;

impl Obfuscator {
    pub fn new() -> Self {
        Self
    }

    /// Obfuscates `source` with `options`.
    pub fn obfuscate(source: &str, options: &ObfuscatorOptions) -> Result<ObfuscationResult> {
        Obfuscator.transform(source, options)
    }

    fn transforms() -> Vec<Box<dyn Transform>> {
        vec![
            Box::new(StringArrayTransform::new()),
            Box::new(RenameIdentifiers::new()),
            Box::new(NumbersToHex::new()),
        ]
    }

    /// Builds the string array declaration, the hash and the rotation
    /// bootstrap, and places them in front of the program.
    fn emit_custom_nodes(
        &self,
        program: &mut Program,
        mut array: StringArray,
        ctx: &mut TransformContext,
        metadata: &mut ObfuscationMetadata,
    ) -> Result<()> {
        let options = ctx.options.clone();
        let rotate = options.rotate_string_array;

        let rotate_value = if rotate {
            let value = ctx
                .random
                .random_integer(ROTATE_MIN, ROTATE_MAX)
                .clamp(ROTATE_MIN, ROTATE_MAX) as u32;
            array.rotate(value);
            Some(value)
        } else {
            None
        };
        let hash_name = (rotate && options.self_defending).then(|| ctx.naming.generate());

        let mut statements = Vec::new();

        let mut array_node = StringArrayNode::new();
        array_node.initialize(&array)?;
        statements.extend(array_node.realize()?);
        metadata.custom_nodes.push(array_node.name().to_string());

        if let Some(hash_name) = &hash_name {
            let mut hash_node = StringArrayHashNode::new(self, &options);
            hash_node.initialize(array.name(), hash_name.as_str())?;
            statements.extend(hash_node.realize()?);
            metadata.custom_nodes.push(hash_node.name().to_string());
            metadata.string_array_hash = Some(array.hash());
        }

        if let Some(rotate_value) = rotate_value {
            let mut rotate_node = StringArrayRotateFunctionNode::new(
                ctx.naming.as_mut(),
                ctx.random.as_mut(),
                self,
                &options,
            );
            rotate_node.initialize(
                &array,
                array.name(),
                hash_name.clone().unwrap_or_default(),
                rotate_value,
            )?;
            statements.extend(rotate_node.realize()?);
            metadata.custom_nodes.push(rotate_node.name().to_string());
        }

        tracing::debug!(
            "  Custom nodes: {} statements from {:?}",
            statements.len(),
            metadata.custom_nodes
        );
        program.prepend(statements);

        metadata.string_array_length = array.len();
        metadata.string_array_name = Some(array.name().to_string());
        metadata.string_array_hash_name = hash_name;
        metadata.rotate_value = rotate_value;
        Ok(())
    }
}

impl Engine for Obfuscator {
    fn transform(&self, source: &str, options: &ObfuscatorOptions) -> Result<ObfuscationResult> {
        tracing::debug!("Starting obfuscation pipeline:");
        tracing::debug!("  Input size: {} bytes", source.len());

        let mut program = Program::parse(source)?;
        let original_tokens = program.token_count();
        tracing::debug!(
            "  Statements: {}, tokens: {}",
            program.statements.len(),
            original_tokens
        );

        let mut ctx = TransformContext::new(options);
        for token in program.tokens().filter(|t| t.is_identifier()) {
            ctx.naming.reserve(&token.value);
        }

        let transforms = Self::transforms();
        tracing::debug!("Applying {} transforms", transforms.len());
        let applied = DefaultPass.run(&mut program, &transforms, &mut ctx)?;

        let mut metadata = ObfuscationMetadata {
            transforms_applied: applied.iter().map(|name| name.to_string()).collect(),
            original_tokens,
            ..ObfuscationMetadata::default()
        };

        if let Some(array) = ctx.string_array.take() {
            self.emit_custom_nodes(&mut program, array, &mut ctx, &mut metadata)?;
        }

        metadata.obfuscated_tokens = program.token_count();
        tracing::debug!(
            "  Output tokens: {} (was {})",
            metadata.obfuscated_tokens,
            original_tokens
        );

        Ok(ObfuscationResult::new(program.print(options.compact), metadata))
    }
}
