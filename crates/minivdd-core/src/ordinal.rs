//! Mini-VDD function numbers.
//!
//! The main VDD calls into a mini-VDD through a dense table indexed by these numbers. Only the
//! functions listed in [`Ordinal`] have handlers; every other slot in the table is a
//! registration point that reports "not handled".

macro_rules! ordinals {
    ($($(#[$meta:meta])* $name:ident = $value:literal,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum Ordinal {
            $($(#[$meta])* $name = $value,)*
        }

        impl Ordinal {
            /// Every function number with a handler, in ascending order.
            pub const SUPPORTED: &'static [Ordinal] = &[$(Ordinal::$name,)*];

            pub fn from_raw(raw: u32) -> Option<Self> {
                match raw {
                    $($value => Some(Ordinal::$name),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Ordinal::$name => stringify!($name),)*
                }
            }
        }
    };
}

ordinals! {
    RegisterDisplayDriver = 0,
    PreHiresToVga = 4,
    PostHiresToVga = 5,
    EnableTraps = 13,
    DisplayDriverDisabling = 26,
    GetCurrentBankWrite = 32,
    GetCurrentBankRead = 33,
    SetBank = 34,
    /// Reports whether the session is currently in a hi-res mode.
    CheckHiresMode = 35,
    GetTotalVramSize = 36,
    GetBankSize = 37,
    SetHiresMode = 38,
    PreHiresSaveRestore = 39,
    PostHiresSaveRestore = 40,
    VesaSupport = 41,
    GetChipId = 42,
    CheckScreenSwitchOk = 43,
    VesaCallPostProcessing = 47,
}

impl Ordinal {
    pub fn raw(self) -> u32 {
        self as u32
    }
}

impl From<Ordinal> for u32 {
    fn from(ordinal: Ordinal) -> Self {
        ordinal.raw()
    }
}
