use clap::Parser;

/// Parses the host settings from the command line arguments.
///
/// Android has no command line; its entry point runs with defaults.
pub fn parse_args<T: Parser>() -> Result<T, clap::Error> {
    T::try_parse()
}

/// Like [`parse_args`], from an explicit argument list (the first item is the binary name).
pub fn parse_args_from<T, I, S>(args: I) -> Result<T, clap::Error>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    T::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LifecycleEvent;
    use crate::settings::Settings;

    #[test]
    fn test_defaults() {
        let settings: Settings = parse_args_from(["embedded-view-bridge"]).unwrap();
        assert_eq!(
            settings.events,
            vec![
                LifecycleEvent::Foreground,
                LifecycleEvent::Background,
                LifecycleEvent::Foreground,
                LifecycleEvent::Teardown,
            ]
        );
        assert_eq!(settings.tick_rate, 60);
        assert_eq!(settings.view_id, "game_view");
        assert!(!settings.rebuild_on_background);
        assert!(!settings.skip_registration);
    }

    #[test]
    fn test_event_list() {
        let settings: Settings =
            parse_args_from(["embedded-view-bridge", "--events", "resume,pause,pause"]).unwrap();
        assert_eq!(
            settings.events,
            vec![
                LifecycleEvent::Foreground,
                LifecycleEvent::Background,
                LifecycleEvent::Background,
            ]
        );
    }

    #[test]
    fn test_tick_rate_is_bounded() {
        for rate in ["0", "1001", "4294967295"] {
            let result: Result<Settings, _> =
                parse_args_from(["embedded-view-bridge", "--tick-rate", rate]);
            assert!(result.is_err(), "tick rate {rate} accepted");
        }
        let settings: Settings =
            parse_args_from(["embedded-view-bridge", "--tick-rate", "1000"]).unwrap();
        assert_eq!(settings.tick_rate, 1000);
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result: Result<Settings, _> =
            parse_args_from(["embedded-view-bridge", "--events", "fg,sideways"]);
        assert!(result.is_err());
    }
}
