#[cfg(test)]
pub mod test {
    use std::fmt;
    use std::str::FromStr;

    use crate::schema::{Annotations, Entry, Mapped, Schema};

    /// The classic two-group layout: a flag in `[General]` and credentials
    /// in `[Authentication]`.
    pub const APP_INI: &str = "\
[General]
Enable = true
[Authentication]
Username = alice
Remember = false
";

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct AppConfig {
        pub enable: bool,
        pub authentication: AuthConfig,
    }

    impl Mapped for AppConfig {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .field_with(
                    "Enable",
                    |c| &c.enable,
                    |c| &mut c.enable,
                    Annotations::new().group("General"),
                )
                .nested("Authentication", |c| &c.authentication, |c| &mut c.authentication)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct AuthConfig {
        pub username: String,
        pub token: String,
        pub remember: bool,
    }

    impl Default for AuthConfig {
        fn default() -> Self {
            Self {
                username: String::new(),
                token: "none".into(),
                remember: true,
            }
        }
    }

    impl Mapped for AuthConfig {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .group("Authentication")
                .field("Username", |a| &a.username, |a| &mut a.username)
                .field("Token", |a| &a.token, |a| &mut a.token)
                .field("Remember", |a| &a.remember, |a| &mut a.remember)
        }
    }

    // -- Fixture covering every scalar kind and annotation ----------------------

    /// A registered custom type.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Port(pub u16);

    impl fmt::Display for Port {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl FromStr for Port {
        type Err = std::num::ParseIntError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            s.trim().parse().map(Port)
        }
    }

    /// A custom type no test registers a converter for.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub enum Mode {
        #[default]
        Fast,
        Slow,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: i32,
        pub timeout_ms: i64,
        pub ratio: f32,
        pub verbose: bool,
        pub listen: Port,
        pub mode: Mode,
        pub scratch: String,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: String::new(),
                port: 0,
                timeout_ms: 30_000,
                ratio: 0.5,
                verbose: false,
                listen: Port(80),
                mode: Mode::Slow,
                scratch: "untouched".into(),
            }
        }
    }

    impl Mapped for ServerConfig {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .group("Server")
                .field_with(
                    "Host",
                    |s| &s.host,
                    |s| &mut s.host,
                    Annotations::new().entry(Entry::new().default_value("localhost")),
                )
                .field_with(
                    "Port",
                    |s| &s.port,
                    |s| &mut s.port,
                    Annotations::new().entry(Entry::new().default_value("8080")),
                )
                .field("TimeoutMs", |s| &s.timeout_ms, |s| &mut s.timeout_ms)
                .field("Ratio", |s| &s.ratio, |s| &mut s.ratio)
                .field_with(
                    "Verbose",
                    |s| &s.verbose,
                    |s| &mut s.verbose,
                    Annotations::new().entry(Entry::new().group("Logging").key("verbose")),
                )
                .field("Listen", |s| &s.listen, |s| &mut s.listen)
                .field("Mode", |s| &s.mode, |s| &mut s.mode)
                .field_with(
                    "Scratch",
                    |s| &s.scratch,
                    |s| &mut s.scratch,
                    Annotations::new().ignored(),
                )
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct BadDefault {
        pub retries: i32,
    }

    impl Mapped for BadDefault {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema.group("Net").field_with(
                "Retries",
                |b| &b.retries,
                |b| &mut b.retries,
                Annotations::new().entry(Entry::new().default_value("three")),
            )
        }
    }

    /// Primitives outside the engine's built-in set, served by the
    /// pre-registered converters.
    #[derive(Debug, Default, PartialEq)]
    pub struct Wide {
        pub ratio: f64,
        pub port: u16,
        pub tag: char,
        pub retries: u8,
    }

    impl Mapped for Wide {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .group("S")
                .field("Ratio", |w| &w.ratio, |w| &mut w.ratio)
                .field("Port", |w| &w.port, |w| &mut w.port)
                .field("Tag", |w| &w.tag, |w| &mut w.tag)
                .field_with(
                    "Retries",
                    |w| &w.retries,
                    |w| &mut w.retries,
                    Annotations::new().entry(Entry::new().default_value("3")),
                )
        }
    }

    /// A `u8` whose explicit default doesn't fit.
    #[derive(Debug, Default, PartialEq)]
    pub struct WideBadDefault {
        pub level: u8,
    }

    impl Mapped for WideBadDefault {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema.group("S").field_with(
                "Level",
                |w| &w.level,
                |w| &mut w.level,
                Annotations::new().entry(Entry::new().default_value("300")),
            )
        }
    }

    // -- Fixtures for composite group precedence -------------------------------

    /// Two members of the same composite type, one re-grouped at the member.
    #[derive(Debug, Default, PartialEq)]
    pub struct MirrorConfig {
        pub primary: AuthConfig,
        pub backup: AuthConfig,
    }

    impl Mapped for MirrorConfig {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .nested("Primary", |m| &m.primary, |m| &mut m.primary)
                .nested_with(
                    "Backup",
                    |m| &m.backup,
                    |m| &mut m.backup,
                    Annotations::new().group("Backup"),
                )
        }
    }

    /// Groupless leaves flattened into whatever group the parent resolves.
    #[derive(Debug, Default, PartialEq)]
    pub struct Limits {
        pub max: i32,
        pub min: i32,
    }

    impl Mapped for Limits {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .field("Max", |l| &l.max, |l| &mut l.max)
                .field("Min", |l| &l.min, |l| &mut l.min)
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct PoolConfig {
        pub name: String,
        pub limits: Limits,
        pub fallback: Option<AuthConfig>,
    }

    impl Mapped for PoolConfig {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema
                .group("Pool")
                .field("Name", |p| &p.name, |p| &mut p.name)
                .nested("Limits", |p| &p.limits, |p| &mut p.limits)
                .nested_opt("Fallback", |p| &p.fallback, |p| &mut p.fallback)
        }
    }

    // -- Fixtures for the nesting-depth guard ---------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct Leaf {
        pub value: i32,
    }

    impl Mapped for Leaf {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema.group("Leaf").field("Value", |l| &l.value, |l| &mut l.value)
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Deep<T> {
        pub inner: T,
    }

    impl<T: Mapped> Mapped for Deep<T> {
        fn describe(schema: Schema<Self>) -> Schema<Self> {
            schema.nested("Inner", |d| &d.inner, |d| &mut d.inner)
        }
    }

    type Deep4<T> = Deep<Deep<Deep<Deep<T>>>>;
    type Deep16<T> = Deep4<Deep4<Deep4<Deep4<T>>>>;

    /// A leaf behind exactly 32 composite levels.
    pub type Deep32 = Deep16<Deep16<Leaf>>;
    pub type Deep33 = Deep<Deep32>;
}
