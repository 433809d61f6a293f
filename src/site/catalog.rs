use crate::app::error::Error;
use serde_derive::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Package {
    DynamicSupreme,
    StaticIp,
    DynamicStandard,
    DynamicDedicated,
}

impl Package {
    pub const ALL: [Package; 4] = [
        Package::DynamicSupreme,
        Package::StaticIp,
        Package::DynamicStandard,
        Package::DynamicDedicated,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Package::DynamicSupreme => "天启动态尊享",
            Package::StaticIp => "静态IP-天启",
            Package::DynamicStandard => "天启动态标准套餐",
            Package::DynamicDedicated => "天启动态独享套餐",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Package::DynamicSupreme => "Dynamic Supreme",
            Package::StaticIp => "Static IP",
            Package::DynamicStandard => "Dynamic Standard",
            Package::DynamicDedicated => "Dynamic Dedicated",
        }
    }

    /// `<option value>` of the package in the personal center dropdown.
    pub fn dropdown_value(self) -> &'static str {
        match self {
            Package::DynamicSupreme => "70",
            Package::StaticIp => "64",
            Package::DynamicStandard => "28",
            Package::DynamicDedicated => "30",
        }
    }

    pub fn price(self) -> &'static str {
        match self {
            Package::DynamicSupreme => "99.00",
            Package::StaticIp => "199.00",
            Package::DynamicStandard => "49.00",
            Package::DynamicDedicated => "149.00",
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.english_name())
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Package {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Package::ALL
            .iter()
            .copied()
            .find(|p| key == normalize(p.english_name()) || key == normalize(p.label()))
            .ok_or_else(|| Error::Usage(format!("Invalid package type: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Balance,
    Alipay,
    Wechat,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Balance,
        PaymentMethod::Alipay,
        PaymentMethod::Wechat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Balance => "余额",
            PaymentMethod::Alipay => "支付宝",
            PaymentMethod::Wechat => "微信",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            PaymentMethod::Balance => "Balance",
            PaymentMethod::Alipay => "Alipay",
            PaymentMethod::Wechat => "WeChat",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.english_name())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        PaymentMethod::ALL
            .iter()
            .copied()
            .find(|m| key == normalize(m.english_name()) || key == m.label())
            .ok_or_else(|| Error::Usage(format!("Invalid payment method: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Funding {
    Funded,
    Unfunded,
}

impl Funding {
    pub fn describe(self) -> &'static str {
        match self {
            Funding::Funded => "account that has balance",
            Funding::Unfunded => "account that has no balance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Test,
    Staging,
    Prod,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Test
    }
}

impl Environment {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Environment::Test => "https://test-ip-tianqi.cd.xiaoxigroup.net",
            Environment::Staging => "https://staging-ip-tianqi.cd.xiaoxigroup.net",
            Environment::Prod => "https://ip-tianqi.cd.xiaoxigroup.net",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(Error::Usage(format!("Unknown environment: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    PackageOrder,
    PersonalCenter,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Login => "/login",
            Page::PackageOrder => "/packageOrder",
            Page::PersonalCenter => "/personal/accountManager",
        }
    }

    pub fn url(self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

pub mod markers {
    pub const ALIPAY_SANDBOX_HOST: &str = "alipaydev.com";
    pub const WECHAT_QR_TEXT: &str = "微信扫码支付";
    pub const RECHARGE_TAB: &str = "tab=recharge";
    pub const PURCHASE_SUCCESS: &str = "套餐购买成功";
    pub const ACCOUNT_CREATED: &str = "创建成功";
    pub const INSUFFICIENT_BALANCE: &str = "账户余额不足";
}
