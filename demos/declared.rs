use std::sync::Arc;

use argwise::{Factories, IntegerFilter, Node, SharedFilter, Validator, Value};

fn main() {
    let factories = Factories::with_builtins().register_filter("port", |_| {
        Ok(Arc::new(IntegerFilter::new().min(1).max(65535)) as SharedFilter)
    });
    let config = Node::new("config")
        .child(Node::new("flag").attribute("name", "tls"))
        .child(
            Node::new("option")
                .attribute("name", "host")
                .attribute("required", "true")
                .child(Node::new("regex").attribute("pattern", r"[a-z0-9.\-]+")),
        )
        .child(
            Node::new("option")
                .attribute("name", "port")
                .attribute("default", "8080")
                .child(Node::new("port")),
        )
        .child(
            Node::new("option")
                .attribute("name", "mode")
                .attribute("default", "serve")
                .child(
                    Node::new("set")
                        .attribute("values", "serve, check")
                        .attribute("case-sensitive", "false"),
                ),
        )
        .child(
            Node::new("argument")
                .attribute("name", "roots")
                .attribute("index", "0")
                .attribute("variadic", "true")
                .child(Node::new("path").attribute("existence", "must-exist")),
        )
        .child(Node::new("only-known-flags"))
        .child(Node::new("only-known-options"));

    let validator = Validator::default();

    if let Err(error) = factories.load(&validator, &config) {
        eprintln!("{error}");
        std::process::exit(2);
    }

    match validator.parse_env() {
        Ok(validated) => {
            let port = validated.value("port").and_then(Value::as_i64).unwrap_or(0);
            let scheme = if validated.flag("tls") { "https" } else { "http" };
            let host = validated.value("host").map(ToString::to_string).unwrap_or_default();
            println!("{scheme}://{host}:{port}");

            if let Some(roots) = validated.value("roots").and_then(Value::as_list) {
                for root in roots {
                    println!("root: {root}");
                }
            }
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}
