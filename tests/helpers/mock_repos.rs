use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use sacco_admin::core::{AppError, Result};
use sacco_admin::modules::auth::models::{NewRefreshToken, RefreshTokenRecord};
use sacco_admin::modules::auth::repositories::TokenRepository;
use sacco_admin::modules::credit::models::{
    CreditRequest, CreditStatus, CreditStatusCounts, NewRepayment, Repayment,
};
use sacco_admin::modules::credit::repositories::CreditRepository;
use sacco_admin::modules::notifications::models::{
    Notification, NotificationIntent, NotificationStatus,
};
use sacco_admin::modules::notifications::repositories::NotificationRepository;
use sacco_admin::modules::notifications::services::NotificationSender;
use sacco_admin::modules::savings::models::SavingsAccount;
use sacco_admin::modules::users::models::{User, UserStatus, UserSummary};
use sacco_admin::modules::users::repositories::{UserListFilter, UserRepository};

/// In-memory credit store
#[derive(Default)]
pub struct MockCreditRepository {
    pub requests: Mutex<HashMap<String, CreditRequest>>,
    pub repayments: Mutex<Vec<Repayment>>,
    pub users: Mutex<HashMap<String, UserSummary>>,
    pub taken_references: Mutex<HashSet<String>>,
    /// Force every candidate reference to read as taken
    pub always_collide: AtomicBool,
}

impl MockCreditRepository {
    pub fn with_request(request: CreditRequest) -> Self {
        let repo = Self::default();
        repo.insert_request(request);
        repo
    }

    pub fn insert_request(&self, request: CreditRequest) {
        self.requests
            .lock()
            .unwrap()
            .insert(request.id.clone(), request);
    }

    pub fn request(&self, id: &str) -> Option<CreditRequest> {
        self.requests.lock().unwrap().get(id).cloned()
    }

    pub fn repayment_count(&self) -> usize {
        self.repayments.lock().unwrap().len()
    }
}

#[async_trait]
impl CreditRepository for MockCreditRepository {
    async fn find_request(&self, id: &str) -> Result<Option<CreditRequest>> {
        Ok(self.request(id))
    }

    async fn find_request_with_repayments(
        &self,
        id: &str,
    ) -> Result<Option<(CreditRequest, Vec<Repayment>)>> {
        let Some(request) = self.request(id) else {
            return Ok(None);
        };
        let repayments = self
            .repayments
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.credit_request_id == id)
            .cloned()
            .collect();
        Ok(Some((request, repayments)))
    }

    async fn find_detail(
        &self,
        id: &str,
    ) -> Result<Option<(CreditRequest, UserSummary, Vec<Repayment>)>> {
        let Some((request, repayments)) = self.find_request_with_repayments(id).await? else {
            return Ok(None);
        };
        let user = self
            .users
            .lock()
            .unwrap()
            .get(&request.user_id)
            .cloned()
            .unwrap_or(UserSummary {
                id: request.user_id.clone(),
                email: "member@example.com".to_string(),
                first_name: "Test".to_string(),
                last_name: "Member".to_string(),
                phone_number: "+254700000000".to_string(),
            });
        Ok(Some((request, user, repayments)))
    }

    async fn list_requests(
        &self,
        status: Option<&str>,
        _sort_by: &str,
        descending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditRequest>> {
        let mut requests: Vec<CreditRequest> = self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|r| status.map_or(true, |s| r.status.to_string() == s))
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.created_at);
        if descending {
            requests.reverse();
        }
        Ok(requests
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_requests(&self, status: Option<&str>) -> Result<i64> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|r| status.map_or(true, |s| r.status.to_string() == s))
            .count() as i64)
    }

    async fn transition_from_pending(
        &self,
        id: &str,
        status: CreditStatus,
        admin_id: &str,
        approved_at: Option<DateTime<Utc>>,
        rejection_reason: Option<&str>,
    ) -> Result<bool> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests.get_mut(id) else {
            return Ok(false);
        };
        if request.status != CreditStatus::Pending {
            return Ok(false);
        }
        request.status = status;
        request.approved_by = Some(admin_id.to_string());
        request.approved_at = approved_at;
        request.rejection_reason = rejection_reason.map(str::to_owned);
        Ok(true)
    }

    async fn reference_exists(&self, reference_number: &str) -> Result<bool> {
        if self.always_collide.load(Ordering::SeqCst) {
            return Ok(true);
        }
        Ok(self
            .taken_references
            .lock()
            .unwrap()
            .contains(reference_number))
    }

    async fn create_repayment(&self, repayment: &NewRepayment) -> Result<Repayment> {
        let row = Repayment {
            id: Uuid::new_v4().to_string(),
            credit_request_id: repayment.credit_request_id.clone(),
            amount: repayment.amount,
            reference_number: repayment.reference_number.clone(),
            payment_date: Utc::now(),
        };
        self.taken_references
            .lock()
            .unwrap()
            .insert(row.reference_number.clone());
        self.repayments.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_for_user_with_repayments(
        &self,
        user_id: &str,
    ) -> Result<Vec<(CreditRequest, Vec<Repayment>)>> {
        let requests: Vec<CreditRequest> = self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        let mut out = Vec::new();
        for request in requests {
            let repayments = self
                .repayments
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.credit_request_id == request.id)
                .cloned()
                .collect();
            out.push((request, repayments));
        }
        Ok(out)
    }

    async fn count_by_status_for_user(&self, user_id: &str) -> Result<CreditStatusCounts> {
        let mut counts = CreditStatusCounts::default();
        for request in self.requests.lock().unwrap().values() {
            if request.user_id != user_id {
                continue;
            }
            match request.status {
                CreditStatus::Pending => counts.pending += 1,
                CreditStatus::Approved => counts.approved += 1,
                CreditStatus::Rejected => counts.rejected += 1,
                CreditStatus::Disbursed => counts.disbursed += 1,
                CreditStatus::Repaid => counts.repaid += 1,
            }
        }
        Ok(counts)
    }
}

/// In-memory notification outbox
#[derive(Default)]
pub struct MockNotificationRepository {
    pub rows: Mutex<Vec<Notification>>,
    /// Make enqueue fail, to prove transitions survive it
    pub fail_enqueue: AtomicBool,
}

impl MockNotificationRepository {
    pub fn titles(&self) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn statuses(&self) -> Vec<NotificationStatus> {
        self.rows.lock().unwrap().iter().map(|n| n.status).collect()
    }
}

#[async_trait]
impl NotificationRepository for MockNotificationRepository {
    async fn enqueue(&self, intent: &NotificationIntent) -> Result<Notification> {
        if self.fail_enqueue.load(Ordering::SeqCst) {
            return Err(AppError::internal("outbox unavailable"));
        }
        let row = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: intent.user_id.clone(),
            kind: intent.kind.clone(),
            title: intent.title.clone(),
            body: intent.body.clone(),
            status: NotificationStatus::Pending,
            attempts: 0,
            created_at: Utc::now(),
            sent_at: None,
            read_at: None,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn claim_pending(&self, batch: i64) -> Result<Vec<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.status == NotificationStatus::Pending)
            .take(batch as usize)
            .cloned()
            .collect())
    }

    async fn record_attempt(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|n| n.id == id) {
            row.attempts += 1;
        }
        Ok(())
    }

    async fn mark_sent(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|n| n.id == id) {
            row.status = NotificationStatus::Sent;
            row.sent_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_failed(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|n| n.id == id) {
            row.status = NotificationStatus::Failed;
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id && n.status != NotificationStatus::Failed)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_for_user(&self, user_id: &str) -> Result<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id && n.status != NotificationStatus::Failed)
            .count() as i64)
    }
}

/// Sender that always fails, for retry/exhaustion tests
pub struct FailingSender;

#[async_trait]
impl NotificationSender for FailingSender {
    async fn deliver(&self, _notification: &Notification) -> Result<()> {
        Err(AppError::internal("delivery channel down"))
    }
}

/// In-memory user directory
#[derive(Default)]
pub struct MockUserRepository {
    pub users: Mutex<HashMap<String, User>>,
    pub accounts: Mutex<HashMap<String, SavingsAccount>>,
}

impl MockUserRepository {
    pub fn with_user(user: User) -> Self {
        let repo = Self::default();
        repo.insert_user(user);
        repo
    }

    pub fn insert_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }

    fn matches(user: &User, filter: &UserListFilter) -> bool {
        filter
            .role
            .as_deref()
            .map_or(true, |r| user.role.to_string() == r)
            && filter
                .status
                .as_deref()
                .map_or(true, |s| user.status.to_string() == s)
            && filter
                .email
                .as_deref()
                .map_or(true, |e| user.email.to_lowercase().contains(&e.to_lowercase()))
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.phone_number == phone_number)
            .cloned())
    }

    async fn list(
        &self,
        filter: &UserListFilter,
        _sort_by: &str,
        descending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| Self::matches(u, filter))
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        if descending {
            users.reverse();
        }
        Ok(users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &UserListFilter) -> Result<i64> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| Self::matches(u, filter))
            .count() as i64)
    }

    async fn update_profile(
        &self,
        id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(id) {
            if let Some(v) = first_name {
                user.first_name = v.to_string();
            }
            if let Some(v) = last_name {
                user.last_name = v.to_string();
            }
            if let Some(v) = phone_number {
                user.phone_number = v.to_string();
            }
        }
        Ok(())
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn update_status(&self, id: &str, status: UserStatus) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.status = status;
        }
        Ok(())
    }

    async fn savings_account_for(&self, user_id: &str) -> Result<Option<SavingsAccount>> {
        Ok(self.accounts.lock().unwrap().get(user_id).cloned())
    }
}

/// In-memory refresh-token store
#[derive(Default)]
pub struct MockTokenRepository {
    pub rows: Mutex<Vec<RefreshTokenRecord>>,
}

impl MockTokenRepository {
    pub fn active_count(&self) -> usize {
        let now = Utc::now();
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.is_usable(now))
            .count()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn create(&self, token: &NewRefreshToken) -> Result<RefreshTokenRecord> {
        let record = RefreshTokenRecord {
            id: Uuid::new_v4().to_string(),
            user_id: token.user_id.clone(),
            token_hash: token.token_hash.clone(),
            device_info: token.device_info.clone(),
            ip_address: token.ip_address.clone(),
            created_at: Utc::now(),
            expires_at: token.expires_at,
            revoked_at: None,
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn revoke(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|t| t.id == id) {
            if row.revoked_at.is_none() {
                row.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn count_active_for_user(&self, user_id: &str) -> Result<i64> {
        let now = Utc::now();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && t.is_usable(now))
            .count() as i64)
    }

    async fn last_login(&self, user_id: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.created_at)
            .max())
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.created_at > since)
            .count() as i64)
    }

    async fn count_active(&self) -> Result<i64> {
        Ok(self.active_count() as i64)
    }
}
