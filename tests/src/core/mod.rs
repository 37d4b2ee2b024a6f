mod int32;
mod number;
mod seed;
mod statement;
mod template;
