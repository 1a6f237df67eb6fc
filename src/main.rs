use dotenvy::dotenv;
use meritboard::logging;
use meritboard::metrics;
use meritboard::router::init_router;
use meritboard::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    logging::init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    if let Some(handle) = metrics::init_metrics() {
        let metrics_router = metrics::metrics_app(handle);
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind("0.0.0.0:9100")
                .await
                .expect("Failed to bind metrics listener");
            axum::serve(listener, metrics_router)
                .await
                .expect("Metrics server failed");
        });
        println!("📈 Metrics available at http://localhost:9100/metrics");
    }

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📖 API reference available at http://localhost:3000/scalar");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    logging::shutdown_tracer().await;
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
}
