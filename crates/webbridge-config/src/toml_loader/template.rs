//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# webbridge configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "webbridge"
# url = "about:blank"
# width = 1024           # 100-10000
# height = 768           # 100-10000
# transparent = false
# devtools = false
# hidden = false

[bridge]
# call_timeout_ms = 30000        # 0 = wait forever
# navigation_timeout_ms = 0      # 0 = wait forever

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
}
