//! Shared in-memory fakes for integration tests.

#![allow(dead_code)]

use alloy::primitives::{address, Address, Log, TxHash, B256, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use payroll_chain::blockchain::contracts::Payroll;
use payroll_chain::blockchain::types::{BlockchainError, BlockchainResult, ConfirmedTx, RevertKind};
use payroll_chain::payroll::{Employee, PayrollChain, PayrollRequest};
use payroll_chain::resolver::{namehash, NameLookup, NameResolver};

pub const PAYROLL_CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const EMPLOYER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const BOB: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const ALICE: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
pub const CAROL: Address = address!("90F79bf6EB2c4f870365E785982E1f101E93b906");

/// Every interaction the orchestrator had with the fake chain, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    CreatePayroll {
        payment_day: U256,
        duration: U256,
        total: U256,
    },
    AddEmployee {
        payroll_id: U256,
        wallet: Address,
        amount: U256,
    },
    Wait(TxHash),
    Counter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxKind {
    Create { id: U256 },
    Add { index: usize },
}

#[derive(Default)]
struct ChainState {
    calls: Vec<ChainCall>,
    txs: HashMap<TxHash, TxKind>,
    next_tx: u64,
    adds: usize,
    counter: U256,
    /// A submitted transaction nobody has waited for yet.
    unconfirmed: Option<TxHash>,
    overlapping_submissions: usize,
}

/// Scriptable [`PayrollChain`].
///
/// By default every transaction confirms and creation emits `PayrollCreated`.
pub struct FakePayrollChain {
    state: Mutex<ChainState>,
    emit_event: bool,
    event_id: Option<U256>,
    reject_create: bool,
    revert_create: bool,
    timeout_create: bool,
    reject_add_at: Option<usize>,
    revert_add_at: Option<usize>,
    timeout_add_at: Option<usize>,
    counter_fails: bool,
}

impl FakePayrollChain {
    /// A chain on which `existing` payrolls were already created.
    pub fn new(existing: u64) -> Self {
        Self {
            state: Mutex::new(ChainState {
                counter: U256::from(existing),
                ..Default::default()
            }),
            emit_event: true,
            event_id: None,
            reject_create: false,
            revert_create: false,
            timeout_create: false,
            reject_add_at: None,
            revert_add_at: None,
            timeout_add_at: None,
            counter_fails: false,
        }
    }

    /// Receipts carry no `PayrollCreated` log.
    pub fn without_event(mut self) -> Self {
        self.emit_event = false;
        self
    }

    /// The event reports `id` regardless of the counter.
    pub fn with_event_id(mut self, id: u64) -> Self {
        self.event_id = Some(U256::from(id));
        self
    }

    pub fn rejecting_create(mut self) -> Self {
        self.reject_create = true;
        self
    }

    pub fn reverting_create(mut self) -> Self {
        self.revert_create = true;
        self
    }

    pub fn timing_out_create(mut self) -> Self {
        self.timeout_create = true;
        self
    }

    pub fn rejecting_add(mut self, index: usize) -> Self {
        self.reject_add_at = Some(index);
        self
    }

    pub fn reverting_add(mut self, index: usize) -> Self {
        self.revert_add_at = Some(index);
        self
    }

    pub fn timing_out_add(mut self, index: usize) -> Self {
        self.timeout_add_at = Some(index);
        self
    }

    pub fn failing_counter(mut self) -> Self {
        self.counter_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<ChainCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Submitted transactions (creates and adds), in order.
    pub fn submissions(&self) -> Vec<ChainCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ChainCall::CreatePayroll { .. } | ChainCall::AddEmployee { .. }))
            .collect()
    }

    pub fn added_wallets(&self) -> Vec<Address> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChainCall::AddEmployee { wallet, .. } => Some(wallet),
                _ => None,
            })
            .collect()
    }

    /// Times a transaction was submitted while another was still unconfirmed.
    pub fn overlapping_submissions(&self) -> usize {
        self.state.lock().unwrap().overlapping_submissions
    }

    fn submit(&self, call: ChainCall, kind: TxKind) -> TxHash {
        let mut state = self.state.lock().unwrap();
        if state.unconfirmed.is_some() {
            state.overlapping_submissions += 1;
        }
        state.next_tx += 1;
        let hash = TxHash::from(U256::from(state.next_tx).to_be_bytes::<32>());
        state.calls.push(call);
        state.txs.insert(hash, kind);
        state.unconfirmed = Some(hash);
        hash
    }

    fn created_log(&self, id: U256) -> Log {
        let event = Payroll::PayrollCreated {
            payrollId: self.event_id.unwrap_or(id),
            employer: EMPLOYER,
            paymentDay: U256::from(15),
            duration: U256::from(12),
            expectedTotalAmount: U256::ZERO,
        };
        Log {
            address: PAYROLL_CONTRACT,
            data: event.encode_log_data(),
        }
    }
}

#[async_trait]
impl PayrollChain for FakePayrollChain {
    fn contract_address(&self) -> Address {
        PAYROLL_CONTRACT
    }

    async fn submit_create_payroll(
        &self,
        payment_day: U256,
        duration: U256,
        expected_total_wei: U256,
    ) -> BlockchainResult<TxHash> {
        if self.reject_create {
            return Err(BlockchainError::Contract(RevertKind::InsufficientBalance));
        }
        let id = {
            let mut state = self.state.lock().unwrap();
            let id = state.counter;
            state.counter += U256::from(1);
            id
        };
        Ok(self.submit(
            ChainCall::CreatePayroll {
                payment_day,
                duration,
                total: expected_total_wei,
            },
            TxKind::Create { id },
        ))
    }

    async fn submit_add_employee(
        &self,
        payroll_id: U256,
        employee: Address,
        monthly_wei: U256,
    ) -> BlockchainResult<TxHash> {
        let index = self.state.lock().unwrap().adds;
        if self.reject_add_at == Some(index) {
            return Err(BlockchainError::Rpc("nonce too low".to_string()));
        }
        self.state.lock().unwrap().adds += 1;
        Ok(self.submit(
            ChainCall::AddEmployee {
                payroll_id,
                wallet: employee,
                amount: monthly_wei,
            },
            TxKind::Add { index },
        ))
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmedTx> {
        let kind = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(ChainCall::Wait(tx_hash));
            if state.unconfirmed == Some(tx_hash) {
                state.unconfirmed = None;
            }
            state.txs.get(&tx_hash).copied()
        };

        let timeout = || BlockchainError::Timeout {
            tx_hash,
            waited_secs: 120,
        };
        let logs = match kind {
            None => return Err(timeout()),
            Some(TxKind::Create { .. }) if self.timeout_create => return Err(timeout()),
            Some(TxKind::Create { .. }) if self.revert_create => {
                return Err(BlockchainError::Reverted(tx_hash))
            }
            Some(TxKind::Create { id }) if self.emit_event => vec![self.created_log(id)],
            Some(TxKind::Create { .. }) => vec![],
            Some(TxKind::Add { index }) if self.timeout_add_at == Some(index) => return Err(timeout()),
            Some(TxKind::Add { index }) if self.revert_add_at == Some(index) => {
                return Err(BlockchainError::Reverted(tx_hash))
            }
            Some(TxKind::Add { .. }) => vec![],
        };

        Ok(ConfirmedTx {
            tx_hash,
            block_number: 100,
            logs,
        })
    }

    async fn payroll_counter(&self) -> BlockchainResult<U256> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ChainCall::Counter);
        if self.counter_fails {
            return Err(BlockchainError::Rpc("execution reverted".to_string()));
        }
        Ok(state.counter)
    }
}

#[derive(Debug, Clone, Copy)]
enum NameRecord {
    Resolved(Address),
    /// Registered with a resolver that has no address record.
    NoAddress,
    Failing,
    Panicking,
}

/// Scriptable [`NameLookup`]. Unknown names have no resolver.
#[derive(Default)]
pub struct FakeNameLookup {
    records: HashMap<B256, NameRecord>,
    calls: AtomicUsize,
    looked_up: Mutex<HashSet<B256>>,
    /// Registry lookups block here until this many are in flight.
    rendezvous: Option<Arc<Barrier>>,
}

/// Resolver contract address the fake hands out.
pub const FAKE_RESOLVER: Address = address!("4976fb03C32e5B8cfe2b6cCB31c09Ba78EBaBa41");

impl FakeNameLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str, address: Address) -> Self {
        self.records.insert(namehash(name), NameRecord::Resolved(address));
        self
    }

    pub fn with_unbound_name(mut self, name: &str) -> Self {
        self.records.insert(namehash(name), NameRecord::NoAddress);
        self
    }

    pub fn with_failing_name(mut self, name: &str) -> Self {
        self.records.insert(namehash(name), NameRecord::Failing);
        self
    }

    pub fn with_panicking_name(mut self, name: &str) -> Self {
        self.records.insert(namehash(name), NameRecord::Panicking);
        self
    }

    /// Hold every registry lookup until `parties` of them are waiting at once.
    pub fn with_rendezvous(mut self, parties: usize) -> Self {
        self.rendezvous = Some(Arc::new(Barrier::new(parties)));
        self
    }

    /// Total registry and resolver calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Registry lookups for `name`.
    pub fn was_looked_up(&self, name: &str) -> bool {
        self.looked_up.lock().unwrap().contains(&namehash(name))
    }
}

#[async_trait]
impl NameLookup for FakeNameLookup {
    async fn resolver_of(&self, node: B256) -> BlockchainResult<Address> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.looked_up.lock().unwrap().insert(node);
        if let Some(barrier) = &self.rendezvous {
            barrier.wait().await;
        }
        match self.records.get(&node) {
            None => Ok(Address::ZERO),
            Some(NameRecord::Failing) => Err(BlockchainError::Connectivity {
                rpc_url: "https://eth-mainnet.g.alchemy.com/v2/***".to_string(),
                message: "connection refused".to_string(),
            }),
            Some(NameRecord::Panicking) => panic!("lookup exploded"),
            Some(_) => Ok(FAKE_RESOLVER),
        }
    }

    async fn address_of(&self, resolver: Address, node: B256) -> BlockchainResult<Address> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(resolver, FAKE_RESOLVER);
        match self.records.get(&node) {
            Some(NameRecord::Resolved(address)) => Ok(*address),
            _ => Ok(Address::ZERO),
        }
    }
}

/// Resolver over `lookup`, keeping a handle for call assertions.
pub fn resolver_with(lookup: FakeNameLookup) -> (NameResolver, Arc<FakeNameLookup>) {
    let lookup = Arc::new(lookup);
    (NameResolver::new(lookup.clone()), lookup)
}

pub fn employee(name: &str, wallet: &str, amount: &str) -> Employee {
    Employee {
        name: name.to_string(),
        email: None,
        wallet_address: wallet.to_string(),
        amount: amount.to_string(),
    }
}

pub fn request(employees: Vec<Employee>) -> PayrollRequest {
    PayrollRequest {
        payment_day: 15,
        duration: 12,
        expected_total_amount: "10.0".to_string(),
        employer_address: Some(EMPLOYER.to_checksum(None)),
        employees,
    }
}

pub fn ether(amount: &str) -> U256 {
    payroll_chain::payroll::amount::parse_ether(amount).unwrap()
}
