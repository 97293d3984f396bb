use std::process::ExitCode;

fn main() -> ExitCode {
    embedded_view_bridge::native_main()
}
