use crate::app::assert::Expectation;
use crate::app::context::Settle;
use crate::app::operation::Operation;
use crate::site::catalog::{markers, Funding, Package, Page, PaymentMethod};
use crate::site::locators::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    PackageOrder,
    PersonalCenter,
}

/// One row of the scenario table. Unfunded scenarios always pay by balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub surface: Surface,
    pub package: Package,
    pub payment: PaymentMethod,
    pub funding: Funding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub name: &'static str,
    pub description: String,
    pub operations: Vec<Operation>,
}

impl PlannedStep {
    fn new(name: &'static str, description: String, operations: Vec<Operation>) -> Self {
        Self {
            name,
            description,
            operations,
        }
    }
}

impl Scenario {
    pub fn purchase(surface: Surface, package: Package, payment: PaymentMethod) -> Self {
        Self {
            surface,
            package,
            payment,
            funding: Funding::Funded,
        }
    }

    pub fn no_balance(surface: Surface, package: Package) -> Self {
        Self {
            surface,
            package,
            payment: PaymentMethod::Balance,
            funding: Funding::Unfunded,
        }
    }

    pub fn name(&self) -> String {
        match (self.funding, self.surface) {
            (Funding::Funded, Surface::PackageOrder) => {
                format!("{} - {} Payment", self.package, self.payment)
            }
            (Funding::Funded, Surface::PersonalCenter) => {
                format!("Personal Center - {} - {} Payment", self.package, self.payment)
            }
            (Funding::Unfunded, Surface::PackageOrder) => {
                format!("No Balance - {} - Package Order", self.package)
            }
            (Funding::Unfunded, Surface::PersonalCenter) => {
                format!("No Balance - {} - Personal Center", self.package)
            }
        }
    }

    pub fn description(&self) -> String {
        match (self.funding, self.surface) {
            (Funding::Funded, Surface::PackageOrder) => format!(
                "Test {} payment for {} package",
                self.payment, self.package
            ),
            (Funding::Funded, Surface::PersonalCenter) => format!(
                "Test {} payment for {} in Personal Center",
                self.payment, self.package
            ),
            (Funding::Unfunded, Surface::PackageOrder) => format!(
                "Test no balance scenario for {} on package order page",
                self.package
            ),
            (Funding::Unfunded, Surface::PersonalCenter) => format!(
                "Test no balance scenario for {} in personal center",
                self.package
            ),
        }
    }

    pub fn plan(&self) -> Vec<PlannedStep> {
        let mut steps = vec![PlannedStep::new(
            "Login",
            format!("Login with {}", self.funding.describe()),
            vec![Operation::Login(self.funding)],
        )];
        match self.surface {
            Surface::PackageOrder => self.plan_package_order(&mut steps),
            Surface::PersonalCenter => self.plan_personal_center(&mut steps),
        }
        steps
    }

    fn plan_package_order(&self, steps: &mut Vec<PlannedStep>) {
        steps.push(PlannedStep::new(
            "Open Package Order",
            "Navigate to the package order page".to_owned(),
            vec![Operation::Open(Page::PackageOrder), Operation::Pause(Settle::Medium)],
        ));
        steps.push(PlannedStep::new(
            "Select Package",
            format!("Select {} package ({} CNY)", self.package, self.package.price()),
            vec![
                Operation::Click(Target::PackageCard(self.package)),
                Operation::Pause(Settle::Short),
            ],
        ));
        steps.push(PlannedStep::new(
            "Click Buy Now",
            "Click the buy now button".to_owned(),
            vec![Operation::Click(Target::BuyNow), Operation::Pause(Settle::Medium)],
        ));
        steps.push(PlannedStep::new(
            "Select Payment Method",
            format!("Select {} payment", self.payment),
            vec![
                Operation::Click(Target::PaymentOption(self.payment)),
                Operation::Pause(Settle::Short),
            ],
        ));

        if self.funding == Funding::Unfunded {
            steps.push(PlannedStep::new(
                "Click Recharge",
                "Click the recharge button shown instead of pay now".to_owned(),
                vec![
                    Operation::ClickWithFallback(Target::RechargeNoBalance, Target::RechargeNow),
                    Operation::Pause(Settle::Medium),
                ],
            ));
            steps.push(PlannedStep::new(
                "Verify Recharge Redirect",
                "Check the recharge tab opened".to_owned(),
                vec![Operation::Expect(Expectation::UrlContains(
                    markers::RECHARGE_TAB,
                ))],
            ));
            return;
        }

        steps.push(PlannedStep::new(
            "Click Pay Now",
            "Click the pay now button".to_owned(),
            vec![self.pay_click(Target::PayNow), Operation::Pause(Settle::Medium)],
        ));
        steps.push(self.verify_payment(Target::PurchaseSuccess, Some(Target::SuccessPopupClose)));
    }

    fn plan_personal_center(&self, steps: &mut Vec<PlannedStep>) {
        steps.push(PlannedStep::new(
            "Open Personal Center",
            "Navigate to the account manager page".to_owned(),
            vec![Operation::Open(Page::PersonalCenter), Operation::Pause(Settle::Medium)],
        ));
        steps.push(PlannedStep::new(
            "Add Paid Account",
            "Open the add paid account popup".to_owned(),
            vec![
                Operation::Click(Target::AddPaidAccount),
                Operation::Expect(Expectation::Visible(Target::PackagePopupHeader)),
            ],
        ));
        steps.push(PlannedStep::new(
            "Select Package",
            format!("Select {} in the package dropdown", self.package),
            vec![Operation::Select(
                Target::PackageDropdown(self.funding),
                self.package.dropdown_value(),
            )],
        ));
        steps.push(PlannedStep::new(
            "Enter Account Name",
            "Type a random account name".to_owned(),
            vec![Operation::TypeRandomAccount(Target::AccountInput(self.funding))],
        ));
        steps.push(PlannedStep::new(
            "Select Payment Method",
            format!("Select {} payment", self.payment),
            vec![
                Operation::Click(Target::PaymentOption(self.payment)),
                Operation::Pause(Settle::Short),
            ],
        ));
        steps.push(PlannedStep::new(
            "Confirm Payment",
            "Click the confirm button".to_owned(),
            vec![self.pay_click(Target::ConfirmPay), Operation::Pause(Settle::Medium)],
        ));

        if self.funding == Funding::Unfunded {
            steps.push(PlannedStep::new(
                "Verify Insufficient Balance",
                "Check the insufficient balance message".to_owned(),
                vec![Operation::Expect(Expectation::Visible(
                    Target::InsufficientBalance,
                ))],
            ));
            return;
        }

        steps.push(self.verify_payment(Target::AccountCreated, None));
    }

    fn pay_click(&self, target: Target) -> Operation {
        match self.payment {
            PaymentMethod::Alipay => Operation::ClickOpeningWindow(target),
            _ => Operation::Click(target),
        }
    }

    fn verify_payment(&self, balance_marker: Target, balance_close: Option<Target>) -> PlannedStep {
        match self.payment {
            PaymentMethod::Balance => {
                let mut operations = vec![Operation::Expect(Expectation::Visible(balance_marker))];
                if let Some(close) = balance_close {
                    operations.push(Operation::Click(close));
                    operations.push(Operation::Pause(Settle::Short));
                }
                PlannedStep::new(
                    "Verify Success",
                    "Check the balance payment went through".to_owned(),
                    operations,
                )
            }
            PaymentMethod::Alipay => PlannedStep::new(
                "Verify Alipay Redirect",
                "Check the Alipay sandbox opened in a new window".to_owned(),
                vec![
                    Operation::SwitchToNewestWindow,
                    Operation::Pause(Settle::Long),
                    Operation::Expect(Expectation::UrlContains(markers::ALIPAY_SANDBOX_HOST)),
                    Operation::CloseWindowToMain,
                ],
            ),
            PaymentMethod::Wechat => PlannedStep::new(
                "Verify WeChat QR Code",
                "Check the WeChat QR code popup".to_owned(),
                vec![
                    Operation::Expect(Expectation::Visible(Target::WechatQr)),
                    Operation::Click(Target::WechatPopupClose),
                    Operation::Pause(Settle::Short),
                ],
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub name: String,
    pub scenarios: Vec<Scenario>,
}

impl Suite {
    pub fn single() -> Self {
        Self {
            name: "Single Test".to_owned(),
            scenarios: vec![Scenario::purchase(
                Surface::PackageOrder,
                Package::DynamicSupreme,
                PaymentMethod::Balance,
            )],
        }
    }

    pub fn package_payments(package: Package) -> Self {
        Self {
            name: format!("Package Payment Tests - {}", package),
            scenarios: every_payment(Surface::PackageOrder, package),
        }
    }

    pub fn personal_center(package: Package) -> Self {
        Self {
            name: format!("Personal Center Tests - {}", package),
            scenarios: every_payment(Surface::PersonalCenter, package),
        }
    }

    pub fn no_balance() -> Self {
        Self {
            name: "No Balance Tests".to_owned(),
            scenarios: no_balance_scenarios(),
        }
    }

    pub fn complete() -> Self {
        let mut scenarios = Vec::new();
        for package in Package::ALL.iter() {
            scenarios.extend(every_payment(Surface::PackageOrder, *package));
        }
        for package in Package::ALL.iter() {
            scenarios.extend(every_payment(Surface::PersonalCenter, *package));
        }
        scenarios.extend(no_balance_scenarios());
        Self {
            name: "Complete Test Suite".to_owned(),
            scenarios,
        }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }
}

fn every_payment(surface: Surface, package: Package) -> Vec<Scenario> {
    PaymentMethod::ALL
        .iter()
        .map(|payment| Scenario::purchase(surface, package, *payment))
        .collect()
}

fn no_balance_scenarios() -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for package in Package::ALL.iter() {
        scenarios.push(Scenario::no_balance(Surface::PackageOrder, *package));
        scenarios.push(Scenario::no_balance(Surface::PersonalCenter, *package));
    }
    scenarios
}
