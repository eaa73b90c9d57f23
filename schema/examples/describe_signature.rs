//! Demonstrates turning a function signature into servable metadata.
//!
//! Run with: `cargo run --example describe_signature -p dlhub-schema`

use dlhub_schema::hint::{signature_to_input, signature_to_output, Parameter, TypeHint};
use dlhub_schema::{Servable, ServableMethod, DEFAULT_METHOD};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // def predict(frame: ndarray, labels: list[str]) -> dict
    let params = [
        Parameter::annotated("frame", "ndarray")?,
        Parameter::annotated("labels", "list[str]")?,
    ];
    let returns: TypeHint = "dict".parse()?;

    let mut method = ServableMethod::new(
        signature_to_input(&params)?,
        signature_to_output(Some(&returns))?,
    );
    method.set_unpack(true)?;

    let mut servable = Servable::default();
    servable.register_function(DEFAULT_METHOD, method);

    println!("Inputs:  {}", servable.methods[DEFAULT_METHOD].input.kind());
    println!("Outputs: {}", servable.methods[DEFAULT_METHOD].output.kind());
    println!();
    println!("{}", serde_json::to_string_pretty(&servable)?);
    Ok(())
}
