use invocation_spy_lambda::adapters::object_store::ObjectStore;
use invocation_spy_lambda::adapters::s3::S3ObjectStore;
use invocation_spy_lambda::handlers::spy::{handle_spied_invocation, Spy, SpyConfig};
use invocation_spy_lambda::runtime::contract::{InvocationContext, InvocationDescriptor};
use lambda_runtime::{service_fn, Context, Error, LambdaEvent};
use serde_json::{json, Value};

fn invocation_context(context: &Context) -> InvocationContext {
    InvocationContext {
        request_id: Some(context.request_id.clone()),
        function_name: Some(context.env_config.function_name.clone()),
        invoked_function_arn: Some(context.invoked_function_arn.clone()),
        ..InvocationContext::default()
    }
}

async fn handle_request<S: ObjectStore>(
    spy: &Spy<S>,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let invocation = InvocationDescriptor::new(event.payload, invocation_context(&event.context));

    let (artifact, response) = handle_spied_invocation(spy, invocation, |_| async {
        Ok::<_, String>(json!({ "status": "ok" }))
    })
    .await
    .map_err(|error| Error::from(error.to_string()))?;

    Ok(with_artifact_key(response, artifact.map(|value| value.key)))
}

fn with_artifact_key(mut response: Value, artifact_key: Option<String>) -> Value {
    if let Some(fields) = response.as_object_mut() {
        fields.insert("artifact_key".to_string(), json!(artifact_key));
    }
    response
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = SpyConfig::from_env();
    let spy = Spy::from_config(&config, S3ObjectStore::from_default_config().await);
    let spy = &spy;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(spy, event).await
    }))
    .await
}
