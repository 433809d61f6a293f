use crate::site::catalog::{markers, Funding, Package, PaymentMethod};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Id,
    XPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub value: String,
}

impl Locator {
    pub fn id(value: &str) -> Self {
        Self {
            strategy: Strategy::Id,
            value: value.to_owned(),
        }
    }

    pub fn xpath<S: Into<String>>(value: S) -> Self {
        Self {
            strategy: Strategy::XPath,
            value: value.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let strategy = match self.strategy {
            Strategy::Id => "id",
            Strategy::XPath => "xpath",
        };
        write!(f, "{}={}", strategy, self.value)
    }
}

fn div_with_text(text: &str) -> Locator {
    Locator::xpath(format!("//div[contains(text(), '{}')]", text))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    PhoneInput,
    PasswordInput,
    LoginButton,
    LoginError,
    LogoutLink,
    PackageCard(Package),
    BuyNow,
    PayNow,
    RechargeNoBalance,
    RechargeNow,
    PaymentOption(PaymentMethod),
    PurchaseSuccess,
    SuccessPopupClose,
    WechatQr,
    WechatPopupClose,
    AddPaidAccount,
    PackagePopupHeader,
    PackageDropdown(Funding),
    AccountInput(Funding),
    ConfirmPay,
    AccountCreated,
    InsufficientBalance,
}

impl Target {
    pub fn locator(self) -> Locator {
        match self {
            Target::PhoneInput => Locator::id("__BVID__23"),
            Target::PasswordInput => Locator::id("__BVID__24"),
            Target::LoginButton => Locator::xpath("//button[contains(text(), '登录')]"),
            Target::LoginError => Locator::xpath(
                "//div[contains(text(), '错误') or contains(text(), 'error') or contains(text(), '失败')]",
            ),
            Target::LogoutLink => Locator::xpath("//a[contains(text(), '退出登录')]"),
            Target::PackageCard(package) => div_with_text(package.label()),
            Target::BuyNow => div_with_text("立即购买"),
            Target::PayNow => div_with_text("立即支付"),
            Target::RechargeNoBalance => Locator::xpath(
                "//div[@class='buyBt hover text-center' and contains(text(), '立即充值')]",
            ),
            Target::RechargeNow => div_with_text("立即充值"),
            Target::PaymentOption(method) => div_with_text(method.label()),
            Target::PurchaseSuccess => div_with_text(markers::PURCHASE_SUCCESS),
            Target::SuccessPopupClose => {
                Locator::xpath("//div[contains(@class, 'fee-header') and contains(text(), '×')]")
            }
            Target::WechatQr => div_with_text(markers::WECHAT_QR_TEXT),
            Target::WechatPopupClose => Locator::xpath(
                "//i[contains(@class, 'icon--x') and contains(@class, 'close-icon')]",
            ),
            Target::AddPaidAccount => Locator::xpath("//button[contains(text(), '添加付费账户')]"),
            Target::PackagePopupHeader => Locator::id("__BVID__66___BV_modal_header_"),
            Target::PackageDropdown(Funding::Funded) => Locator::id("__BVID__548"),
            Target::PackageDropdown(Funding::Unfunded) => Locator::id("__BVID__98"),
            Target::AccountInput(Funding::Funded) => Locator::id("__BVID__552"),
            Target::AccountInput(Funding::Unfunded) => Locator::id("__BVID__102"),
            Target::ConfirmPay => div_with_text("确定"),
            Target::AccountCreated => Locator::xpath(format!(
                "//div[contains(@class, 'ml-20') and contains(text(), '{}')]",
                markers::ACCOUNT_CREATED
            )),
            Target::InsufficientBalance => Locator::xpath(format!(
                "//div[contains(@class, 'ml-20') and contains(text(), '{}')]",
                markers::INSUFFICIENT_BALANCE
            )),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.locator())
    }
}
