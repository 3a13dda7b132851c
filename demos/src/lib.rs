use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Single shapes
    Shapes,
    /// Nested blocks and pen control
    Patterns,
}

impl Group {
    pub fn all() -> Vec<Self> {
        vec![Group::Shapes, Group::Patterns]
    }

    pub fn demos(&self) -> Vec<Demo> {
        Demo::all()
            .into_iter()
            .filter(|d| d.group == *self)
            .collect()
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Shapes => write!(f, "Shapes"),
            Group::Patterns => write!(f, "Patterns"),
        }
    }
}

pub struct Demo {
    /// short name used on the command line
    pub name: &'static str,
    pub summary: &'static str,
    pub code: &'static str,
    pub group: Group,
}

macro_rules! demos {
    ($(
        #[doc = $doc:expr]
        $const:ident ( $file:literal as $name:literal ) $group:ident
    ),+ $(,)?) => {
        impl Demo {
            $(
                pub const $const: Demo = Demo {
                    name: $name,
                    summary: $doc,
                    code: include_str!($file),
                    group: Group::$group,
                };
            )+

            pub fn all() -> Vec<Demo> {
                vec![
                    $(Self::$const),+
                ]
            }
        }
    };
}

impl Demo {
    pub fn find(name: &str) -> Option<Demo> {
        Demo::all().into_iter().find(|d| d.name == name)
    }

    /// The script split into the lines a user would submit one by one.
    pub fn lines(&self) -> impl Iterator<Item = &'static str> {
        self.code.split_inclusive('\n')
    }
}

demos! {
    /// A square drawn with a single repeat
    SQUARE("../scripts/square.logo" as "square") Shapes,
    /// A five-pointed star
    STAR("../scripts/star.logo" as "star") Shapes,
    /// A growing square spiral
    SPIRAL("../scripts/spiral.logo" as "spiral") Shapes,
    /// Twelve rotated squares
    FLOWER("../scripts/flower.logo" as "flower") Patterns,
    /// A dashed line using penup and pendown
    DASHES("../scripts/dashes.logo" as "dashes") Patterns,
    /// Stairs written with short command names
    STAIRS("../scripts/stairs.logo" as "stairs") Patterns,
}
