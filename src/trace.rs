use tracing::span::{Attributes, Id};
use tracing::{field::Visit, Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use chrono::Local;
use console::style;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[derive(Debug, Clone)]
struct TraceNode {
    level: Level,
    name: String,
    fields: Vec<(String, String)>,
    start_time: Option<Instant>,
    took: u128, // microseconds
}

impl Visit for TraceNode {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{:?}", value)));
    }
}

impl TraceNode {
    fn new(level: Level, name: &str) -> Self {
        Self {
            level,
            name: name.to_string(),
            fields: Vec::new(),
            start_time: None,
            took: 0,
        }
    }

    fn format_message(&self) -> String {
        let mut parts = Vec::new();

        // Message field doesn't get key=value treatment
        match self.fields.iter().find(|(k, _)| k == "message") {
            Some((_, msg)) => parts.push(style(msg.trim_matches('"')).italic().to_string()),
            None => parts.push(style(&self.name).cyan().to_string()),
        }

        let fields: String = self
            .fields
            .iter()
            .filter(|(k, _)| k != "message")
            .map(|(k, v)| format!("{}={}", k, v.trim_matches('"')))
            .collect::<Vec<_>>()
            .join(" ");

        if !fields.is_empty() {
            parts.push(fields);
        }

        parts.join(" ")
    }
}

fn format_line(level: &Level, duration: &str, message: &str) -> String {
    let formatted_time = Local::now().format("%H:%M:%S%.3f").to_string();
    let level = match *level {
        Level::ERROR => style(format!("{:>5}", level)).red().to_string(),
        Level::WARN => style(format!("{:>5}", level)).yellow().to_string(),
        _ => format!("{:>5}", level),
    };
    format!("{} {} {:>7} {}", formatted_time, level, duration, message)
}

/// Prints events to stderr as they happen, and a timing line for every
/// span when it closes.
#[derive(Clone)]
pub struct StderrLayer {
    spans: Arc<Mutex<HashMap<Id, TraceNode>>>,
    max_level: Level,
}

impl StderrLayer {
    pub fn new(max_level: Level) -> Self {
        StderrLayer {
            spans: Arc::new(Mutex::new(HashMap::new())),
            max_level,
        }
    }
}

impl<S> Layer<S> for StderrLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let metadata = attrs.metadata();
        let mut node = TraceNode::new(*metadata.level(), metadata.name());
        attrs.record(&mut node);

        if let Ok(mut spans) = self.spans.lock() {
            spans.insert(id.clone(), node);
        }
    }

    fn on_enter(&self, id: &Id, _ctx: Context<'_, S>) {
        if let Ok(mut spans) = self.spans.lock() {
            if let Some(node) = spans.get_mut(id) {
                node.start_time = Some(Instant::now());
            }
        }
    }

    fn on_exit(&self, id: &Id, _ctx: Context<'_, S>) {
        if let Ok(mut spans) = self.spans.lock() {
            if let Some(node) = spans.get_mut(id) {
                if let Some(start_time) = node.start_time.take() {
                    node.took += start_time.elapsed().as_micros();
                }
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut node = TraceNode::new(*metadata.level(), metadata.name());
        event.record(&mut node);
        eprintln!("{}", format_line(&node.level, "", &node.format_message()));
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        let node = match self.spans.lock() {
            Ok(mut spans) => spans.remove(&id),
            Err(_) => None,
        };
        if let Some(node) = node {
            let duration = format!("{}ms", node.took / 1000);
            eprintln!("{}", format_line(&node.level, &duration, &node.format_message()));
        }
    }
}

/// Installs [`StderrLayer`] as the global subscriber.
pub fn init(max_level: Level) {
    let registry = Registry::default().with(StderrLayer::new(max_level));
    tracing::subscriber::set_global_default(registry).expect("setting tracing default failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let mut node = TraceNode::new(Level::INFO, "event src/emit/mod.rs:1");
        node.fields
            .push(("message".to_string(), "processing group".to_string()));
        node.fields.push(("script".to_string(), "Latn".to_string()));
        node.fields
            .push(("block".to_string(), "\"Basic Latin\"".to_string()));

        let message = console::strip_ansi_codes(&node.format_message()).to_string();
        assert_eq!(message, "processing group script=Latn block=Basic Latin");
    }

    #[test]
    fn test_span_without_message_uses_name() {
        let mut node = TraceNode::new(Level::INFO, "generate");
        node.fields.push(("language".to_string(), "Go".to_string()));

        let message = console::strip_ansi_codes(&node.format_message()).to_string();
        assert_eq!(message, "generate language=Go");
    }

    #[test]
    fn test_layer_filters_by_level() {
        let layer = StderrLayer::new(Level::WARN);
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::INFO));
        });
    }
}
