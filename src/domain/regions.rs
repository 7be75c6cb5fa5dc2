//! Reference tables: issuing states, license categories and dial codes

use crate::domain::documents::{BrDocsError, BrDocsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Digits in an issuing state code
pub const STATE_CODE_LEN: usize = 2;

/// The 27 Brazilian federative units, in issuing-code order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)]
pub enum BrazilianState {
    AC,
    AL,
    AP,
    AM,
    BA,
    CE,
    DF,
    ES,
    GO,
    MA,
    MT,
    MS,
    MG,
    PA,
    PB,
    PR,
    PE,
    PI,
    RJ,
    RN,
    RS,
    RO,
    RR,
    SC,
    SP,
    SE,
    TO,
}

impl BrazilianState {
    /// All states ordered by issuing code
    pub fn all() -> &'static [BrazilianState] {
        use BrazilianState::*;
        &[
            AC, AL, AP, AM, BA, CE, DF, ES, GO, MA, MT, MS, MG, PA, PB, PR, PE, PI, RJ, RN, RS,
            RO, RR, SC, SP, SE, TO,
        ]
    }

    /// Two-digit issuing code, 1-based position in [`BrazilianState::all`]
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    /// Issuing code as a zero-padded string
    pub fn code_str(self) -> String {
        format!("{:02}", self.code())
    }

    /// Look up by issuing code
    pub fn from_code(code: u8) -> BrDocsResult<Self> {
        code.checked_sub(1)
            .and_then(|index| Self::all().get(index as usize))
            .copied()
            .ok_or_else(|| BrDocsError::UnknownState { code: format!("{code:02}") })
    }

    /// Two-letter abbreviation
    pub fn abbreviation(self) -> &'static str {
        use BrazilianState::*;
        match self {
            AC => "AC",
            AL => "AL",
            AP => "AP",
            AM => "AM",
            BA => "BA",
            CE => "CE",
            DF => "DF",
            ES => "ES",
            GO => "GO",
            MA => "MA",
            MT => "MT",
            MS => "MS",
            MG => "MG",
            PA => "PA",
            PB => "PB",
            PR => "PR",
            PE => "PE",
            PI => "PI",
            RJ => "RJ",
            RN => "RN",
            RS => "RS",
            RO => "RO",
            RR => "RR",
            SC => "SC",
            SP => "SP",
            SE => "SE",
            TO => "TO",
        }
    }

    /// Full state name
    pub fn name(self) -> &'static str {
        use BrazilianState::*;
        match self {
            AC => "Acre",
            AL => "Alagoas",
            AP => "Amapá",
            AM => "Amazonas",
            BA => "Bahia",
            CE => "Ceará",
            DF => "Distrito Federal",
            ES => "Espírito Santo",
            GO => "Goiás",
            MA => "Maranhão",
            MT => "Mato Grosso",
            MS => "Mato Grosso do Sul",
            MG => "Minas Gerais",
            PA => "Pará",
            PB => "Paraíba",
            PR => "Paraná",
            PE => "Pernambuco",
            PI => "Piauí",
            RJ => "Rio de Janeiro",
            RN => "Rio Grande do Norte",
            RS => "Rio Grande do Sul",
            RO => "Rondônia",
            RR => "Roraima",
            SC => "Santa Catarina",
            SP => "São Paulo",
            SE => "Sergipe",
            TO => "Tocantins",
        }
    }
}

impl fmt::Display for BrazilianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for BrazilianState {
    type Err = BrDocsError;

    /// Accepts an abbreviation ("sp") or an issuing code ("25")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code);
        }
        Self::all()
            .iter()
            .copied()
            .find(|state| state.abbreviation().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BrDocsError::UnknownState { code: s.to_string() })
    }
}

/// Driver's license categories, single and combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)]
pub enum LicenseCategory {
    A,
    B,
    C,
    D,
    E,
    AB,
    AC,
    AD,
    AE,
    BC,
    BD,
    BE,
    CD,
    CE,
    DE,
}

impl LicenseCategory {
    pub fn all() -> &'static [LicenseCategory] {
        use LicenseCategory::*;
        &[A, B, C, D, E, AB, AC, AD, AE, BC, BD, BE, CD, CE, DE]
    }

    pub fn as_str(self) -> &'static str {
        use LicenseCategory::*;
        match self {
            A => "A",
            B => "B",
            C => "C",
            D => "D",
            E => "E",
            AB => "AB",
            AC => "AC",
            AD => "AD",
            AE => "AE",
            BC => "BC",
            BD => "BD",
            BE => "BE",
            CD => "CD",
            CE => "CE",
            DE => "DE",
        }
    }

    /// Short label, e.g. "Moto + Carro"
    pub fn label(self) -> &'static str {
        use LicenseCategory::*;
        match self {
            A => "Motocicleta",
            B => "Automóvel",
            C => "Caminhão",
            D => "Ônibus",
            E => "Reboque",
            AB => "Moto + Carro",
            AC => "Moto + Caminhão",
            AD => "Moto + Ônibus",
            AE => "Moto + Reboque",
            BC => "Carro + Caminhão",
            BD => "Carro + Ônibus",
            BE => "Carro + Reboque",
            CD => "Caminhão + Ônibus",
            CE => "Caminhão + Reboque",
            DE => "Ônibus + Reboque",
        }
    }

    pub fn description(self) -> &'static str {
        use LicenseCategory::*;
        match self {
            A => "Motocicletas, ciclomotores e similares",
            B => "Veículos de passeio e comerciais leves",
            C => "Veículos de carga com peso bruto total superior a 3.500kg",
            D => "Veículos de transporte de passageiros com mais de 8 lugares",
            E => "Veículos de carga com reboque ou semireboque",
            AB => "Motocicletas e veículos de passeio",
            AC => "Motocicletas e caminhões",
            AD => "Motocicletas e ônibus",
            AE => "Motocicletas e veículos com reboque",
            BC => "Veículos de passeio e caminhões",
            BD => "Veículos de passeio e ônibus",
            BE => "Veículos de passeio e reboque",
            CD => "Caminhões e ônibus",
            CE => "Caminhões e reboque",
            DE => "Ônibus e reboque",
        }
    }
}

impl fmt::Display for LicenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.as_str(), self.label())
    }
}

impl FromStr for LicenseCategory {
    type Err = BrDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BrDocsError::UnknownCategory { code: s.to_string() })
    }
}

/// A country entry for phone dial-code lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2, lowercase
    pub code: &'static str,
    /// International dial code without the leading '+'
    pub dial_code: &'static str,
    pub name: &'static str,
}

const COUNTRIES: &[Country] = &[
    Country { code: "br", dial_code: "55", name: "Brasil" },
    Country { code: "us", dial_code: "1", name: "Estados Unidos" },
    Country { code: "ar", dial_code: "54", name: "Argentina" },
    Country { code: "cl", dial_code: "56", name: "Chile" },
    Country { code: "co", dial_code: "57", name: "Colômbia" },
    Country { code: "mx", dial_code: "52", name: "México" },
    Country { code: "pe", dial_code: "51", name: "Peru" },
    Country { code: "uy", dial_code: "598", name: "Uruguai" },
    Country { code: "py", dial_code: "595", name: "Paraguai" },
    Country { code: "bo", dial_code: "591", name: "Bolívia" },
    Country { code: "ec", dial_code: "593", name: "Equador" },
    Country { code: "ve", dial_code: "58", name: "Venezuela" },
    Country { code: "pt", dial_code: "351", name: "Portugal" },
    Country { code: "es", dial_code: "34", name: "Espanha" },
    Country { code: "fr", dial_code: "33", name: "França" },
    Country { code: "de", dial_code: "49", name: "Alemanha" },
    Country { code: "it", dial_code: "39", name: "Itália" },
    Country { code: "gb", dial_code: "44", name: "Reino Unido" },
    Country { code: "ca", dial_code: "1", name: "Canadá" },
    Country { code: "au", dial_code: "61", name: "Austrália" },
];

impl Country {
    pub fn all() -> &'static [Country] {
        COUNTRIES
    }

    /// Look up by ISO code, case-insensitive
    pub fn lookup(code: &str) -> BrDocsResult<&'static Country> {
        let trimmed = code.trim();
        COUNTRIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BrDocsError::UnknownCountry { code: code.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_state_codes_are_sequential() {
        let states = BrazilianState::all();
        assert_eq!(states.len(), 27);
        for (index, state) in states.iter().enumerate() {
            assert_eq!(state.code() as usize, index + 1);
        }
        assert_eq!(BrazilianState::AC.code_str(), "01");
        assert_eq!(BrazilianState::SP.code_str(), "25");
        assert_eq!(BrazilianState::TO.code_str(), "27");
    }

    #[rstest]
    #[case("sp", BrazilianState::SP)]
    #[case("RJ", BrazilianState::RJ)]
    #[case("07", BrazilianState::DF)]
    #[case("11", BrazilianState::MT)]
    fn test_state_lookup(#[case] input: &str, #[case] expected: BrazilianState) {
        assert_eq!(input.parse::<BrazilianState>().unwrap(), expected);
    }

    #[rstest]
    #[case("XX")]
    #[case("00")]
    #[case("28")]
    fn test_unknown_state(#[case] input: &str) {
        assert!(matches!(
            input.parse::<BrazilianState>(),
            Err(BrDocsError::UnknownState { .. })
        ));
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(LicenseCategory::all().len(), 15);
        assert_eq!("ab".parse::<LicenseCategory>().unwrap(), LicenseCategory::AB);
        assert_eq!(LicenseCategory::AB.to_string(), "AB - Moto + Carro");
        assert!("F".parse::<LicenseCategory>().is_err());
    }

    #[test]
    fn test_country_lookup() {
        assert_eq!(Country::lookup("BR").unwrap().dial_code, "55");
        assert_eq!(Country::lookup("uy").unwrap().dial_code, "598");
        assert!(matches!(Country::lookup("zz"), Err(BrDocsError::UnknownCountry { .. })));
    }
}
