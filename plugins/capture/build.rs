const COMMANDS: &[&str] = &["start", "stop", "capture_state"];

fn main() {
    tauri_plugin::Builder::new(COMMANDS).build();
}
