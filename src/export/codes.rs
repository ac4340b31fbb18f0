//! Provider code tables.
//!
//! The export identifies institutions by numeric code. Names on employee
//! and company records are free text, so each table first maps a name onto
//! a closed enumeration and then the enumeration onto its code. Names that
//! match nothing map to [`OTHER_PROVIDER_CODE`].

/// Code reported for any institution not in a table.
pub const OTHER_PROVIDER_CODE: u16 = 99;

/// Lowercases, strips accents and drops everything but letters and digits.
fn normalize(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            let c = match c.to_lowercase().next().unwrap_or(c) {
                'á' | 'à' | 'ä' => 'a',
                'é' | 'è' | 'ë' => 'e',
                'í' | 'ì' | 'ï' => 'i',
                'ó' | 'ò' | 'ö' => 'o',
                'ú' | 'ù' | 'ü' => 'u',
                'ñ' => 'n',
                other => other,
            };
            c.is_ascii_alphanumeric().then_some(c)
        })
        .collect()
}

/// Pension fund administrators (AFP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PensionFund {
    /// AFP Capital.
    Capital,
    /// AFP Cuprum.
    Cuprum,
    /// AFP Habitat.
    Habitat,
    /// AFP PlanVital.
    PlanVital,
    /// AFP Provida.
    Provida,
    /// AFP Modelo.
    Modelo,
    /// AFP Uno.
    Uno,
    /// Any other administrator.
    Other,
}

impl PensionFund {
    /// Maps a fund name, with or without the "AFP" prefix.
    pub fn from_name(name: &str) -> Self {
        let key = normalize(name);
        match key.strip_prefix("afp").unwrap_or(key.as_str()) {
            "capital" => PensionFund::Capital,
            "cuprum" => PensionFund::Cuprum,
            "habitat" => PensionFund::Habitat,
            "planvital" | "vital" => PensionFund::PlanVital,
            "provida" => PensionFund::Provida,
            "modelo" => PensionFund::Modelo,
            "uno" => PensionFund::Uno,
            _ => PensionFund::Other,
        }
    }

    /// Export code.
    pub fn code(self) -> u16 {
        match self {
            PensionFund::Cuprum => 3,
            PensionFund::Habitat => 5,
            PensionFund::Provida => 8,
            PensionFund::PlanVital => 29,
            PensionFund::Capital => 33,
            PensionFund::Modelo => 34,
            PensionFund::Uno => 35,
            PensionFund::Other => OTHER_PROVIDER_CODE,
        }
    }
}

/// Health institutions: the public fund and the private insurers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthInstitution {
    /// Isapre Banmédica.
    Banmedica,
    /// Isapre Consalud.
    Consalud,
    /// Isapre Vida Tres.
    VidaTres,
    /// Isapre Colmena.
    Colmena,
    /// Isapre Cruz Blanca.
    CruzBlanca,
    /// Public health fund.
    Fonasa,
    /// Isapre Nueva Masvida.
    NuevaMasvida,
    /// Isapre Banco Estado.
    BancoEstado,
    /// Isapre Cruz del Norte.
    CruzDelNorte,
    /// Isapre Esencial.
    Esencial,
    /// Any other insurer.
    Other,
}

impl HealthInstitution {
    /// Maps an insurer name, with or without the "Isapre" prefix.
    pub fn from_name(name: &str) -> Self {
        let key = normalize(name);
        match key.strip_prefix("isapre").unwrap_or(key.as_str()) {
            "banmedica" => HealthInstitution::Banmedica,
            "consalud" => HealthInstitution::Consalud,
            "vidatres" => HealthInstitution::VidaTres,
            "colmena" | "colmenagoldencross" => HealthInstitution::Colmena,
            "cruzblanca" => HealthInstitution::CruzBlanca,
            "fonasa" => HealthInstitution::Fonasa,
            "nuevamasvida" | "masvida" => HealthInstitution::NuevaMasvida,
            "bancoestado" | "fundacion" => HealthInstitution::BancoEstado,
            "cruzdelnorte" => HealthInstitution::CruzDelNorte,
            "esencial" => HealthInstitution::Esencial,
            _ => HealthInstitution::Other,
        }
    }

    /// Export code.
    pub fn code(self) -> u16 {
        match self {
            HealthInstitution::Banmedica => 1,
            HealthInstitution::Consalud => 2,
            HealthInstitution::VidaTres => 3,
            HealthInstitution::Colmena => 4,
            HealthInstitution::CruzBlanca => 5,
            HealthInstitution::Fonasa => 7,
            HealthInstitution::NuevaMasvida => 10,
            HealthInstitution::BancoEstado => 12,
            HealthInstitution::CruzDelNorte => 25,
            HealthInstitution::Esencial => 28,
            HealthInstitution::Other => OTHER_PROVIDER_CODE,
        }
    }
}

/// Work-accident insurers (mutuales).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkAccidentInsurer {
    /// No mutual: the public institute (ISL) covers the company.
    Isl,
    /// Asociación Chilena de Seguridad.
    Achs,
    /// Mutual de Seguridad de la CChC.
    MutualCchc,
    /// Instituto de Seguridad del Trabajo.
    Ist,
    /// Any other insurer.
    Other,
}

impl WorkAccidentInsurer {
    /// Maps an insurer name; an absent or blank name means ISL.
    pub fn from_name(name: Option<&str>) -> Self {
        let key = name.map(normalize).unwrap_or_default();
        match key.as_str() {
            "" | "isl" | "ninguna" | "sinmutual" | "institutodeseguridadlaboral" => {
                WorkAccidentInsurer::Isl
            }
            "achs" | "asociacionchilenadeseguridad" => WorkAccidentInsurer::Achs,
            "mutual" | "mutualcchc" | "mutualdeseguridad" | "mutualdeseguridadcchc" => {
                WorkAccidentInsurer::MutualCchc
            }
            "ist" | "institutodeseguridaddeltrabajo" => WorkAccidentInsurer::Ist,
            _ => WorkAccidentInsurer::Other,
        }
    }

    /// Export code.
    pub fn code(self) -> u16 {
        match self {
            WorkAccidentInsurer::Isl => 0,
            WorkAccidentInsurer::Achs => 1,
            WorkAccidentInsurer::MutualCchc => 2,
            WorkAccidentInsurer::Ist => 3,
            WorkAccidentInsurer::Other => OTHER_PROVIDER_CODE,
        }
    }
}

/// Family compensation funds (CCAF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompensationFund {
    /// The company is not affiliated to a fund.
    Unaffiliated,
    /// CCAF Los Andes.
    LosAndes,
    /// CCAF La Araucana.
    LaAraucana,
    /// CCAF Los Héroes.
    LosHeroes,
    /// CCAF 18 de Septiembre.
    DieciochoDeSeptiembre,
    /// Any other fund.
    Other,
}

impl CompensationFund {
    /// Maps a fund name, with or without the "CCAF" prefix; an absent or
    /// blank name means unaffiliated.
    pub fn from_name(name: Option<&str>) -> Self {
        let key = name.map(normalize).unwrap_or_default();
        match key.strip_prefix("ccaf").unwrap_or(key.as_str()) {
            "" | "ninguna" | "sinccaf" => CompensationFund::Unaffiliated,
            "losandes" => CompensationFund::LosAndes,
            "laaraucana" => CompensationFund::LaAraucana,
            "losheroes" => CompensationFund::LosHeroes,
            "18deseptiembre" | "dieciochodeseptiembre" => {
                CompensationFund::DieciochoDeSeptiembre
            }
            _ => CompensationFund::Other,
        }
    }

    /// Export code.
    pub fn code(self) -> u16 {
        match self {
            CompensationFund::Unaffiliated => 0,
            CompensationFund::LosAndes => 1,
            CompensationFund::LaAraucana => 2,
            CompensationFund::LosHeroes => 3,
            CompensationFund::DieciochoDeSeptiembre => 4,
            CompensationFund::Other => OTHER_PROVIDER_CODE,
        }
    }
}
