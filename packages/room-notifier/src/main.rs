use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error};

mod processor;

use processor::RoomNotifier;
use shared::repositories::connection_repository::DynamoDbConnectionRepository;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let config = aws_config::load_from_env().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);

    // The management API client must point at the deployed WebSocket stage.
    let websocket_endpoint = std::env::var("WEBSOCKET_API_URL")
        .expect("WEBSOCKET_API_URL environment variable must be set");
    let api_gateway_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
        .endpoint_url(&websocket_endpoint)
        .build();
    let api_gateway_client = aws_sdk_apigatewaymanagement::Client::from_conf(api_gateway_config);

    let connections = Arc::new(DynamoDbConnectionRepository::new(
        dynamodb_client,
        api_gateway_client,
    ));
    let notifier = RoomNotifier::new(connections);

    run(service_fn(
        move |event: lambda_runtime::LambdaEvent<aws_lambda_events::event::dynamodb::Event>| {
            let notifier = notifier.clone();
            async move { notifier.process_event(event.payload).await }
        },
    ))
    .await
}
