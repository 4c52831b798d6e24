//! Static registry of the supported equations of state.

use crate::error::{EosError, EosResult};
use std::fmt;
use std::str::FromStr;

/// Parameter keys shared by the catalog, the solver and phase-definition files.
pub mod keys {
    pub const V_0: &str = "V_0";
    pub const K_0: &str = "K_0";
    pub const KPRIME_0: &str = "Kprime_0";
    pub const DK0_DT: &str = "dk0dt";
    pub const DK0P_DT: &str = "dk0pdt";
    pub const ALPHA_T0: &str = "alpha_t0";
    pub const D_ALPHA_DT: &str = "d_alpha_dt";
    pub const G_0: &str = "G_0";
    pub const GPRIME_0: &str = "Gprime_0";
    pub const MOLAR_MASS: &str = "molar_mass";
    pub const N: &str = "n";
    pub const DEBYE_0: &str = "Debye_0";
    pub const GRUENEISEN_0: &str = "grueneisen_0";
    pub const Q_0: &str = "q_0";
    pub const ETA_S_0: &str = "eta_s_0";
}

/// Closed set of formulations the solver knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EosKind {
    /// Legacy JCPDS (version 4) Birch-Murnaghan with linear temperature terms.
    Jcpds4,
    /// Isothermal third-order Birch-Murnaghan.
    Bm3,
    /// Stixrude & Lithgow-Bertelloni finite strain with Debye thermal pressure.
    Slb2,
}

impl EosKind {
    pub const ALL: [EosKind; 3] = [EosKind::Jcpds4, EosKind::Bm3, EosKind::Slb2];

    pub fn id(self) -> &'static str {
        self.variant().id
    }

    /// Catalog entry for this kind.
    pub fn variant(self) -> &'static EosVariant {
        match self {
            EosKind::Jcpds4 => &CATALOG[0],
            EosKind::Bm3 => &CATALOG[1],
            EosKind::Slb2 => &CATALOG[2],
        }
    }
}

impl fmt::Display for EosKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EosKind {
    type Err = EosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        describe(s).map(|variant| variant.kind)
    }
}

/// Unit the variant's pressure-like parameters (and its pressure axis) are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    GigaPascal,
    Pascal,
}

impl PressureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            PressureUnit::GigaPascal => "GPa",
            PressureUnit::Pascal => "Pa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    pub key: &'static str,
    pub symbol: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub default: Option<f64>,
}

impl ParameterDescriptor {
    const fn required(
        key: &'static str,
        symbol: &'static str,
        description: &'static str,
        unit: &'static str,
    ) -> Self {
        Self {
            key,
            symbol,
            description,
            unit,
            default: None,
        }
    }

    const fn with_default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosVariant {
    pub kind: EosKind,
    pub id: &'static str,
    pub name: &'static str,
    pub reference: &'static str,
    pub pressure_unit: PressureUnit,
    pub params: &'static [ParameterDescriptor],
}

impl EosVariant {
    pub fn parameter(&self, key: &str) -> Option<&'static ParameterDescriptor> {
        self.params.iter().find(|p| p.key == key)
    }

    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameter(key).is_some()
    }
}

const JCPDS4_PARAMS: [ParameterDescriptor; 7] = [
    ParameterDescriptor::required(keys::V_0, "V0", "Volume at P=1e5 Pa, T=300 K", "Å³"),
    ParameterDescriptor::required(
        keys::K_0,
        "K0",
        "Isothermal bulk modulus at P=1e5 Pa, T=300 K",
        "GPa",
    ),
    ParameterDescriptor::required(keys::KPRIME_0, "K'0", "Pressure derivative of K0", "")
        .with_default(4.0),
    ParameterDescriptor::required(keys::DK0_DT, "dK0/dT", "Temperature derivative of K0", "GPa/K")
        .with_default(0.0),
    ParameterDescriptor::required(
        keys::DK0P_DT,
        "dK'0/dT",
        "Temperature derivative of K'0",
        "1/K",
    )
    .with_default(0.0),
    ParameterDescriptor::required(keys::ALPHA_T0, "αT", "Thermal expansion coefficient", "1/K")
        .with_default(0.0),
    ParameterDescriptor::required(
        keys::D_ALPHA_DT,
        "dαT/dT",
        "Temperature derivative of the thermal expansion coefficient",
        "1/K²",
    )
    .with_default(0.0),
];

const BM3_PARAMS: [ParameterDescriptor; 3] = [
    ParameterDescriptor::required(keys::V_0, "V0", "Volume at P=1e5 Pa, T=300 K", "Å³"),
    ParameterDescriptor::required(
        keys::K_0,
        "K0",
        "Isothermal bulk modulus at P=1e5 Pa, T=300 K",
        "GPa",
    ),
    ParameterDescriptor::required(keys::KPRIME_0, "K'0", "Pressure derivative of K0", "")
        .with_default(4.0),
];

const SLB2_PARAMS: [ParameterDescriptor; 11] = [
    ParameterDescriptor::required(keys::V_0, "V0", "Volume at P=1e5 Pa, T=300 K", "m³/mol"),
    ParameterDescriptor::required(
        keys::K_0,
        "K0",
        "Isothermal bulk modulus at P=1e5 Pa, T=300 K",
        "Pa",
    ),
    ParameterDescriptor::required(keys::KPRIME_0, "K'0", "Pressure derivative of K0", ""),
    ParameterDescriptor::required(keys::G_0, "G0", "Shear modulus at P=1e5 Pa, T=300 K", "Pa"),
    ParameterDescriptor::required(keys::GPRIME_0, "G'0", "Pressure derivative of G0", ""),
    ParameterDescriptor::required(keys::MOLAR_MASS, "μ", "Mass per mole formula unit", "kg/mol")
        .with_default(0.05),
    ParameterDescriptor::required(keys::N, "n", "Number of atoms per formula unit", "")
        .with_default(1.0),
    ParameterDescriptor::required(keys::DEBYE_0, "θ0", "Debye temperature", "K")
        .with_default(300.0),
    ParameterDescriptor::required(
        keys::GRUENEISEN_0,
        "γ0",
        "Grüneisen parameter at P=1e5 Pa, T=300 K",
        "",
    )
    .with_default(1.0),
    ParameterDescriptor::required(
        keys::Q_0,
        "q0",
        "Logarithmic volume derivative of the Grüneisen parameter",
        "",
    )
    .with_default(1.0),
    ParameterDescriptor::required(
        keys::ETA_S_0,
        "ηS0",
        "Shear strain derivative of the Grüneisen parameter",
        "",
    ),
];

const CATALOG: [EosVariant; 3] = [
    EosVariant {
        kind: EosKind::Jcpds4,
        id: "jcpds4",
        name: "Legacy JCPDS4 style Birch-Murnaghan 3rd order with temperature-dependent bulk modulus",
        reference: "",
        pressure_unit: PressureUnit::GigaPascal,
        params: &JCPDS4_PARAMS,
    },
    EosVariant {
        kind: EosKind::Bm3,
        id: "bm3",
        name: "Isothermal Birch-Murnaghan 3rd order",
        reference: "",
        pressure_unit: PressureUnit::GigaPascal,
        params: &BM3_PARAMS,
    },
    EosVariant {
        kind: EosKind::Slb2,
        id: "slb2",
        name: "Stixrude Lithgow-Bertelloni 2nd order",
        reference: "L. Stixrude and C. Lithgow-Bertelloni, Thermodynamics of mantle minerals - I. \
                    Physical properties. Geophys. J. Int. (2005) 162, 610-632",
        pressure_unit: PressureUnit::Pascal,
        params: &SLB2_PARAMS,
    },
];

/// All registered variants, in catalog order.
pub fn equations_of_state() -> &'static [EosVariant] {
    &CATALOG
}

/// Look up a variant by identifier.
pub fn describe(id: &str) -> EosResult<&'static EosVariant> {
    let id = id.trim();
    CATALOG
        .iter()
        .find(|variant| variant.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| EosError::UnknownVariant { id: id.to_string() })
}
