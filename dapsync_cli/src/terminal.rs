//! Terminal detection

use is_terminal::IsTerminal;
use std::env;
use std::io::stderr;

/// Check if stderr is an interactive terminal
///
/// The human summary is written to stderr, so that is the stream that matters
/// for colour decisions.
pub fn is_interactive() -> bool {
    if !stderr().is_terminal() {
        return false;
    }

    // CI runners sometimes allocate a TTY
    if is_ci_environment() {
        return false;
    }

    let term = env::var("TERM").unwrap_or_default();
    term != "dumb"
}

/// Whether coloured output should be produced
pub fn should_colorize(color_enabled: bool) -> bool {
    color_enabled && env::var_os("NO_COLOR").is_none() && is_interactive()
}

/// Detect if running in a CI environment
pub fn is_ci_environment() -> bool {
    let ci_vars = [
        "CI",
        "CONTINUOUS_INTEGRATION",
        "JENKINS_URL",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "TRAVIS",
        "CIRCLECI",
        "BUILDKITE",
        "DRONE",
        "TEAMCITY_VERSION",
        "TF_BUILD", // Azure DevOps
    ];

    ci_vars.iter().any(|var| env::var(var).is_ok())
}
