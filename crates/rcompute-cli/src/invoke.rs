//! Ad-hoc invocation of compute operations from JSON text.

use anyhow::{anyhow, bail, Context, Result};
use rcompute_client::{ComputeClient, Transport};
use rcompute_common::{Argument, OperationAddress};
use serde_json::{json, Value};

/// Parses `--args` into positional arguments.
///
/// The text must be a JSON array; a bare value is rejected so that a single
/// array argument is never mistaken for the whole list.
pub fn parse_positional(text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(text).map_err(|e| anyhow!("Invalid JSON in args: {}", e))?;
    match value {
        Value::Array(items) => Ok(items),
        other => bail!("args must be a JSON array of positional arguments, got {}", other),
    }
}

/// Parses `--args` for a batch call: an array of argument arrays.
pub fn parse_batches(text: &str) -> Result<Vec<Vec<Value>>> {
    parse_positional(text)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Array(args) => Ok(args),
            other => Err(anyhow!("batch entry {} must be an array, got {}", index, other)),
        })
        .collect()
}

/// Calls `address` and renders the decoded result(s) as one JSON value.
///
/// Multi-result calls are rendered as an array in declaration order.
pub async fn invoke<T: Transport>(
    client: &ComputeClient<T>,
    address: &OperationAddress,
    args: &[Value],
    arity: usize,
) -> Result<Value> {
    let arguments: Vec<Argument<'_>> = args.iter().map(Argument::plain).collect();
    let context = || format!("call to {} failed", address);

    let rendered = match arity {
        1 => client.call::<Value>(address, &arguments).await.with_context(context)?,
        2 => {
            let (a, b) = client.call2::<Value, Value>(address, &arguments).await.with_context(context)?;
            json!([a, b])
        }
        3 => {
            let (a, b, c) = client
                .call3::<Value, Value, Value>(address, &arguments)
                .await
                .with_context(context)?;
            json!([a, b, c])
        }
        n => bail!("arity must be 1, 2 or 3, got {}", n),
    };
    Ok(rendered)
}

/// Runs `address` over every argument list in one batch request.
pub async fn invoke_multiple<T: Transport>(
    client: &ComputeClient<T>,
    address: &OperationAddress,
    batches: &[Vec<Value>],
) -> Result<Value> {
    let arguments: Vec<Vec<Argument<'_>>> = batches
        .iter()
        .map(|args| args.iter().map(Argument::plain).collect())
        .collect();
    let results: Vec<Value> = client
        .call_multiple(address, &arguments)
        .await
        .with_context(|| format!("batch call to {} failed", address))?;
    Ok(Value::Array(results))
}
