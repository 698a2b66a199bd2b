//! Vendor enumerations and flag sets found in the run directory files.
//!
//! Integer-coded enumerations resolve from their numeric code and string-coded
//! ones from their literal name; both go through
//! [`enum_from_value_or_member`](super::coerce::enum_from_value_or_member).

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use super::coerce::{MemberOr, VendorEnum};

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(i32)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl VendorEnum for $name {
            type Underlying = i32;
            const NAME: &'static str = stringify!($name);

            fn from_underlying(value: &i32) -> Option<Self> {
                match *value {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            fn to_underlying(&self) -> i32 {
                *self as i32
            }
        }

        impl From<$name> for MemberOr<'_, $name> {
            fn from(member: $name) -> Self {
                MemberOr::Member(member)
            }
        }

        impl From<$name> for i32 {
            fn from(member: $name) -> i32 {
                member as i32
            }
        }
    };
}

macro_rules! str_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// The literal used for this member in the documents
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )+
                }
            }
        }

        impl VendorEnum for $name {
            type Underlying = String;
            const NAME: &'static str = stringify!($name);

            fn from_underlying(value: &String) -> Option<Self> {
                match value.as_str() {
                    $( stringify!($variant) => Some($name::$variant), )+
                    _ => None,
                }
            }

            fn to_underlying(&self) -> String {
                self.as_str().to_string()
            }
        }

        impl From<$name> for MemberOr<'_, $name> {
            fn from(member: $name) -> Self {
                MemberOr::Member(member)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $flag:ident = $bits:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            $( $(#[$fmeta])* pub const $flag: $name = $name($bits); )+

            const KNOWN_BITS: u32 = 0 $( | $bits )+;

            /// Flag set from raw bits, if every bit is a known flag
            pub fn from_bits(bits: u32) -> Option<Self> {
                if bits & !Self::KNOWN_BITS == 0 {
                    Some($name(bits))
                } else {
                    None
                }
            }

            /// Raw bits
            pub fn bits(&self) -> u32 {
                self.0
            }

            /// Whether all flags in `other` are set
            pub fn contains(&self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }

            /// Whether no flag is set
            pub fn is_empty(&self) -> bool {
                self.0 == 0
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }

        impl VendorEnum for $name {
            type Underlying = u32;
            const NAME: &'static str = stringify!($name);

            fn from_underlying(value: &u32) -> Option<Self> {
                Self::from_bits(*value)
            }

            fn to_underlying(&self) -> u32 {
                self.0
            }
        }

        impl From<$name> for MemberOr<'_, $name> {
            fn from(member: $name) -> Self {
                MemberOr::Member(member)
            }
        }
    };
}

int_enum! {
    /// Acquisition status recorded in `Contents.xml`
    AcqStatus {
        /// The acquisition has been initialised
        Init = 0,
        /// The acquisition has started
        Start = 1,
        /// The acquisition has ended
        End = 2,
        /// The acquisition has stopped
        Stop = 3,
    }
}

int_enum! {
    /// How the sample was introduced
    MeasurementType {
        /// Unknown measurement type
        Unknown = 0,
        /// Direct infusion
        Infusion = 1,
        /// Chromatographic separation
        Chromatographic = 2,
    }
}

int_enum! {
    /// Separation technique used ahead of the mass spectrometer
    SeparationTechnique {
        /// Unspecified separation technique
        Unspecified = 0,
        /// No separation
        None = 1,
        /// Gas chromatography
        GC = 2,
        /// Liquid chromatography
        LC = 3,
        /// Capillary electrophoresis
        CE = 4,
    }
}

int_enum! {
    /// Kind of instrument module
    DeviceType {
        /// Unknown device
        Unknown = 0,
        /// Mixed
        Mixed = 1,
        /// Quadrupole mass spectrometer
        Quadrupole = 2,
        /// Ion trap mass spectrometer
        IonTrap = 3,
        /// Time-of-flight mass spectrometer
        TimeOfFlight = 4,
        /// Tandem quadrupole mass spectrometer
        TandemQuadrupole = 5,
        /// Quadrupole time-of-flight mass spectrometer
        QuadrupoleTimeOfFlight = 6,
        /// Flame ionization detector
        FlameIonizationDetector = 10,
        /// Thermal conductivity detector
        ThermalConductivityDetector = 11,
        /// Refractive index detector
        RefractiveIndexDetector = 12,
        /// Multi wavelength detector
        MultiWavelengthDetector = 13,
        /// Diode array detector
        DiodeArrayDetector = 14,
        /// Variable wavelength detector
        VariableWavelengthDetector = 15,
        /// Analog digital converter
        AnalogDigitalConverter = 16,
        /// Electron capture detector
        ElectronCaptureDetector = 17,
        /// Fluorescence detector
        FluorescenceDetector = 18,
        /// Evaporative light scattering detector
        EvaporativeLightScatteringDetector = 19,
        /// ALS
        ALS = 20,
        /// Autosampler
        AutoSampler = 21,
        /// Micro well-plate sampler
        MicroWellPlateSampler = 22,
        /// CTC
        CTC = 23,
        /// Isocratic pump
        IsocraticPump = 30,
        /// Binary pump
        BinaryPump = 31,
        /// Quaternary pump
        QuaternaryPump = 32,
        /// Capillary pump
        CapillaryPump = 33,
        /// Nano pump
        Nanopump = 34,
        /// Low flow pump
        LowFlowPump = 35,
        /// Thermostatted column compartment
        ThermostattedColumnCompartment = 40,
        /// Chip cube
        ChipCube = 41,
        /// CAN valves
        CANValves = 42,
        /// UIB 2
        UIB2 = 43,
        /// Flex cube
        FlexCube = 44,
        /// GC detector
        GCDetector = 50,
        /// Nitrogen-phosphorous detector
        NitrogenPhosphorousDetector = 51,
        /// Flame photometric detector
        FlamePhotometricDetector = 52,
        /// CE
        CE = 60,
        /// SFC
        SFC = 70,
        /// Pump valve cluster
        PumpValveCluster = 80,
        /// Column compartment cluster
        ColumnCompCluster = 81,
        /// HDR
        HDR = 82,
        /// Multi-column cluster
        MultiColumnCluster = 83,
        /// Compact LC isocratic pump
        CompactLCIsoPump = 90,
        /// Compact LC gradient pump
        CompactLCGradPump = 91,
        /// Compact LC 1220 isocratic pump
        CompactLC1220IsoPump = 92,
        /// Compact LC 1220 gradient pump
        CompactLC1220GradPump = 93,
        /// Compact LC column oven
        CompactLCColumnOven = 94,
        /// Compact LC autosampler
        CompactLCSampler = 95,
        /// Compact LC 1220 autosampler
        CompactLC1220Sampler = 96,
        /// Compact LC variable wavelength detector
        CompactLCVWD = 97,
        /// Compact LC 1220 variable wavelength detector
        CompactLC1220VWD = 98,
        /// Compact LC 1220 diode array detector
        CompactLC1220DAD = 99,
    }
}

int_enum! {
    /// Supplier of a device
    DeviceVendor {
        /// Supplied by a company other than Agilent
        Other = 0,
        /// Supplied by Agilent
        Agilent = 1,
    }
}

flag_set! {
    /// Kinds of data a device stores
    StoredDataType {
        /// Unspecified data type
        UNSPECIFIED = 0,
        /// Chromatographic data
        CHROMATOGRAMS = 1,
        /// Instrument curves
        INSTRUMENT_CURVES = 2,
        /// Spectral data
        SPECTRA = 4,
        /// Mass spectral data
        MASS_SPECTRA = 8,
        /// All data types
        ALL = 15,
    }
}

flag_set! {
    /// IRM / runtime calibration status of the time segments
    IrmStatus {
        /// Success
        SUCCESS = 0,
        /// Some reference ions were missed
        SOME_IONS_MISSED = 1,
        /// All reference ions were missed
        ALL_IONS_MISSED = 2,
    }
}

str_enum! {
    /// Mass calibration reference technique
    CalibrationTechnique {
        /// External calibration reference
        ExternalReference,
        /// Internal calibration reference
        InternalReference,
        /// Undefined calibration reference
        Undefined,
    }
}

str_enum! {
    /// Mass calibration formula
    CalibrationFormula {
        /// Traditional formula
        Traditional,
        /// Polynomial formula
        Polynomial,
        /// Original four-term formula
        OriginalFourTerm,
        /// Undefined formula
        Undefined,
    }
}

impl Default for CalibrationTechnique {
    fn default() -> Self {
        CalibrationTechnique::Undefined
    }
}

impl Default for CalibrationFormula {
    fn default() -> Self {
        CalibrationFormula::Undefined
    }
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Unknown
    }
}

impl Default for DeviceVendor {
    fn default() -> Self {
        DeviceVendor::Other
    }
}
