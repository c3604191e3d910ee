const COMMANDS: &[&str] = &["start", "stop", "media_state"];

fn main() {
    tauri_plugin::Builder::new(COMMANDS).build();
}
