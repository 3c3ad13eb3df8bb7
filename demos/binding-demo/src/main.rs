use axum::Json;
use named_binding_core::prelude::*;
use named_binding_core::DEFAULT_CONFIG_FILE;
use named_binding_web::handler::handler_fn;
use named_binding_web::plugin::NamedRouteBindingPlugin;
use named_binding_web::request::RequestContext;
use named_binding_web::server::{ServerProperties, WebServer};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

// ==================== 服务层 ====================

struct GreetingService {
    greeting: String,
}

impl GreetingService {
    fn greet(&self, name: &str) -> String {
        format!("{}, {}!", self.greeting, name)
    }
}

// ==================== 配置 ====================

fn load_environment() -> anyhow::Result<Arc<Environment>> {
    let env = Environment::with_system_env();

    let candidates = ["demos/binding-demo/application.toml", "application.toml", DEFAULT_CONFIG_FILE];
    if let Some(path) = candidates.iter().find(|p| Path::new(p).exists()) {
        let source = TomlPropertySource::from_file(path)
            .with_context(|| format!("Failed to load {}", path))?;
        env.add_property_source(Box::new(source));
    }

    Ok(Arc::new(env))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = load_environment()?;
    LoggingConfig::from_environment(&env).init()?;

    let plugin = NamedRouteBindingPlugin::register(Arc::clone(&env));
    plugin.registry().register_instance(GreetingService {
        greeting: "Hello".to_string(),
    });
    plugin.boot();

    let named = plugin
        .router()
        .get(
            "/users/{user}/posts/{post}",
            MethodDescriptor::new("orderedParams").param("user").param("post"),
            handler_fn(|args: ResolvedArguments| async move {
                Json(json!({ "user": args.str(0), "post": args.str(1) }))
            }),
        )
        .get(
            "/users/{user}/posts/{post}/reversed",
            MethodDescriptor::new("reversedParams").param("post").param("user"),
            handler_fn(|args: ResolvedArguments| async move {
                Json(json!({ "post": args.str(0), "user": args.str(1) }))
            }),
        )
        .get(
            "/accounts/{user_id}",
            MethodDescriptor::new("snakeCaseParam").param("userId"),
            handler_fn(|args: ResolvedArguments| async move {
                Json(json!({ "userId": args.str(0) }))
            }),
        )
        .get(
            "/items/{item}",
            MethodDescriptor::new("withRequest")
                .typed::<RequestContext>("request")
                .param("item"),
            handler_fn(|args: ResolvedArguments| async move {
                let foo = args
                    .instance::<RequestContext>(0)
                    .and_then(|request| request.query("foo").map(String::from));
                Json(json!({ "item": args.str(1), "foo": foo }))
            }),
        )
        .get(
            "/optional/{required}",
            MethodDescriptor::new("withDefault")
                .param("required")
                .param_with_default("optional", "default"),
            handler_fn(|args: ResolvedArguments| async move {
                Json(json!({ "required": args.str(0), "optional": args.str(1) }))
            }),
        )
        .get(
            "/nullable/{value}",
            MethodDescriptor::new("withNullable").param("value").nullable("missing"),
            handler_fn(|args: ResolvedArguments| async move {
                let missing = args.get(1).and_then(|arg| arg.to_json());
                Json(json!({ "value": args.str(0), "missing": missing }))
            }),
        )
        .get(
            "/greet/{user_name}",
            MethodDescriptor::new("greet")
                .param("userName")
                .typed::<GreetingService>("greetings"),
            handler_fn(|args: ResolvedArguments| async move {
                let name = args.str(0).unwrap_or_default();
                let message = args
                    .instance::<GreetingService>(1)
                    .map(|service| service.greet(name));
                Json(json!({ "message": message }))
            }),
        );

    for route in named.routes() {
        tracing::info!(
            method = route.method,
            path = %route.path,
            handler = %route.handler,
            "Mapped route"
        );
    }

    WebServer::new(ServerProperties::from_environment(&env), named.into_router())
        .run()
        .await
}
