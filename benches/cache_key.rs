use ai_cache_rust::{CacheKeyDeriver, CacheSeed, CompletionRequest, Message};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn realistic_request() -> CompletionRequest {
    CompletionRequest::chat(vec![
        Message::system("You are a terse arithmetic assistant."),
        Message::user("1+3="),
        Message::assistant("4"),
        Message::user("Now multiply that by the number of moons of Mars."),
    ])
    .temperature(0.2)
    .max_tokens(256)
    .tools(vec![json!({
        "type": "function",
        "function": {
            "name": "getCurrentWeather",
            "description": "Get the weather in location",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {"type": "string"},
                    "unit": {"type": "string", "enum": ["c", "f"]}
                },
                "required": ["location"]
            }
        }
    })])
}

fn bench_derive(c: &mut Criterion) {
    let deriver = CacheKeyDeriver::new("bench-fingerprint");
    let request = realistic_request();
    let seed = CacheSeed::from(42);

    c.bench_function("derive_cache_key", |b| {
        b.iter(|| {
            deriver
                .derive(black_box(&request), black_box("gpt-4o-mini"), black_box(&seed))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_derive);
criterion_main!(benches);
