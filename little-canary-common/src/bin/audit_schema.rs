// ABOUTME: emits a json schema for one line of the canary audit log to stdout.
// ABOUTME: intended for detection pipelines that validate canary records before correlating them.

fn main() {
    let schema = schemars::schema_for!(little_canary_common::AuditRecord);
    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    println!("{json}");
}
