mod obfuscator;
mod rename;
mod rotate_function;
mod rotation;
mod self_hosting;
